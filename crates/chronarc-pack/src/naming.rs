//! In-archive entry naming.

use chronarc_types::SourceEntry;
use std::collections::HashMap;

/// Timestamp layout of an entry name: `{YYYY}/{Mon}/{DD}/{DD} {Mon} {YYYY} {hh.mmAM}`.
const NAME_FORMAT: &str = "%Y/%b/%d/%d %b %Y %I.%M%p";

/// A source entry paired with its final, collision-free archive name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// The catalogued source entry.
    pub entry: SourceEntry,
    /// Name of the entry inside the archive.
    pub archive_name: String,
}

/// Builds the base archive name for an entry.
///
/// Entries are filed into a year/month/day hierarchy and labelled with the
/// capture time, keeping the source file's extension.
///
/// # Example
///
/// ```
/// use chronarc_pack::entry_name;
/// use chronarc_types::SourceEntry;
/// use chrono::NaiveDate;
///
/// let stamp = NaiveDate::from_ymd_opt(2024, 1, 5)
///     .unwrap()
///     .and_hms_opt(15, 7, 0)
///     .unwrap();
/// let entry = SourceEntry::new(1, "dawn", "/srv/img/dawn.jpg", stamp);
/// assert_eq!(entry_name(&entry), "2024/Jan/05/05 Jan 2024 03.07PM.jpg");
/// ```
#[must_use]
pub fn entry_name(entry: &SourceEntry) -> String {
    numbered_name(entry, 1)
}

/// Assigns archive names to a batch of entries.
///
/// Entries are ordered by timestamp, id, then path; entries whose base names
/// collide get ` (2)`, ` (3)`, ... appended in that order. The result depends
/// only on the set of entries, never on the order they were supplied in.
#[must_use]
pub fn plan_entries(mut entries: Vec<SourceEntry>) -> Vec<PlannedEntry> {
    entries.sort_by(|a, b| {
        a.date_time
            .cmp(&b.date_time)
            .then(a.id.cmp(&b.id))
            .then_with(|| a.file_path.cmp(&b.file_path))
    });

    let mut seen: HashMap<String, usize> = HashMap::with_capacity(entries.len());

    entries
        .into_iter()
        .map(|entry| {
            let occurrence = seen.entry(entry_name(&entry)).or_insert(0);
            *occurrence += 1;
            let archive_name = numbered_name(&entry, *occurrence);
            PlannedEntry {
                entry,
                archive_name,
            }
        })
        .collect()
}

fn numbered_name(entry: &SourceEntry, occurrence: usize) -> String {
    let stem = entry.date_time.format(NAME_FORMAT);
    let suffix = if occurrence > 1 {
        format!(" ({occurrence})")
    } else {
        String::new()
    };

    match entry.extension() {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    }
}
