//! `.xyz` point-cloud listing of the anemone, for external viewers.

use std::{
    fs::OpenOptions,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{anemone::Anemone, types::Point3};

/// The anemone as a flat list: center first, then each tentacle's
/// sensitive points, tentacle by tentacle, root to tip.
pub fn points(anemone: &Anemone) -> impl Iterator<Item = Point3> + '_ {
    std::iter::once(anemone.center()).chain(anemone.sensitive_points())
}

/// Writes one `x y z` line per point of [`points`].
pub fn write_xyz(anemone: &Anemone, mut out: impl Write) -> io::Result<()> {
    for p in points(anemone) {
        writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
    }
    out.flush()
}

/// Writes the listing to a new file at `path`.
///
/// ### Errors
/// Fails if the file already exists or cannot be created.
pub fn save_xyz(anemone: &Anemone, path: impl AsRef<Path>) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    write_xyz(anemone, BufWriter::new(file))
}
