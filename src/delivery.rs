//! Saving the generated outline

use std::io;
use std::path::{Path, PathBuf};

use crate::world::World;

/// The location of a course's outline in the given directory: `course-outline-{course_id}.json`.
pub fn outline_path(dir: &Path, course_id: u64) -> PathBuf {
    dir.join(format!("course-outline-{course_id}.json"))
}

/// Saves the outline, pretty-printed and followed by a newline.
pub async fn save<W: World + ?Sized>(
    world: &W,
    path: &Path,
    outline: &serde_json::Value,
) -> io::Result<()> {
    let mut content = serde_json::to_vec_pretty(outline)?;
    content.push(b'\n');
    world.write_output(path, &content).await
}
