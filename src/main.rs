#![warn(missing_docs)]
//! Exports a course's content from an LMS and saves an outline generated from it.

use std::process::ExitCode;

fn main() -> ExitCode {
    course_outline::entry::main()
}
