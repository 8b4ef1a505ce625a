//! Human readable rendering of a [`Summary`].

use std::path::Path;

use crate::summary::Summary;

const SI_UNITS: &[u8] = b"kMGTPE";

/// Base-1000 rendering with one decimal and a unit letter, e.g. `1.5 M`.
///
/// Values below 1000 are printed as-is followed by a space, so a unit word
/// can be appended in both cases.
pub fn format_si(value: u64) -> String {
    const BASIS: u64 = 1000;
    if value < BASIS {
        return format!("{value} ");
    }
    let mut div = BASIS;
    let mut exp = 0;
    let mut n = value / BASIS;
    while n >= BASIS {
        div *= BASIS;
        exp += 1;
        n /= BASIS;
    }
    format!(
        "{:.1} {}",
        value as f64 / div as f64,
        char::from(SI_UNITS[exp])
    )
}

/// `label : value`, with the SI form appended for values above 999.
pub fn nice_number(label: &str, value: u64) -> String {
    if value > 999 {
        format!("{label} : {value} (i.e. {})", format_si(value))
    } else {
        format!("{label} : {value}")
    }
}

/// Like [`nice_number`], for byte counts.
pub fn nice_bytes(label: &str, value: u64) -> String {
    if value > 999 {
        format!("{label} : {value} Bytes (i.e. {}Bytes)", format_si(value))
    } else {
        format!("{label} : {value} Bytes")
    }
}

/// Multi-line report of the contents of `path`.
pub fn render_summary(path: &Path, summary: &Summary) -> String {
    let mut lines = vec![
        format!("The directory {} now contains:", path.display()),
        nice_number(" - unlinked files            ", summary.unlinked_files),
        nice_bytes(" - bytes in unlinked files   ", summary.unlinked_bytes),
        nice_number(" - hard-linked files         ", summary.linked_files),
        nice_bytes(" - bytes in hard-linked files", summary.linked_bytes),
        "Uncounted special files:".to_string(),
        nice_number(" - directories               ", summary.subdirectories),
        nice_number(" - append-only-flagged files ", summary.append_only),
        nice_number(" - exclusive-flagged files   ", summary.exclusive),
        nice_number(" - temporary-flagged files   ", summary.temporary),
        nice_number(" - symlinks                  ", summary.symlinks),
        nice_number(" - device nodes              ", summary.devices),
        nice_number(" - named pipes               ", summary.named_pipes),
        nice_number(" - sockets                   ", summary.sockets),
    ];
    if summary.total_errors() > 0 {
        lines.extend([
            "Unreadable entries:".to_string(),
            nice_number(" - files (permission denied) ", summary.permission_errors_files),
            nice_number(" - dirs (permission denied)  ", summary.permission_errors_dirs),
            nice_number(" - files (other errors)      ", summary.other_errors_files),
            nice_number(" - dirs (other errors)       ", summary.other_errors_dirs),
        ]);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
