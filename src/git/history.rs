//! Commit history queries via `git log --format`.

use crate::error::{GitError, Result};
use crate::git::CommitInfo;

const FIELD_COUNT: usize = 7;

/// Hash, short hash, author name, author email, author time, parents, subject.
///
/// Used with `-z`. Every field ends in NUL, which no argument vector (and so
/// no commit message) can contain, even when other control bytes are present.
pub(crate) const LOG_FORMAT: &str = "--format=%H%x00%h%x00%an%x00%ae%x00%at%x00%P%x00%s";

/// Parse `git log -z` output produced with [`LOG_FORMAT`], preserving git's ordering.
pub(crate) fn parse_log(output: &str) -> Result<Vec<CommitInfo>> {
    let output = output.strip_suffix('\0').unwrap_or(output);
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }

    let fields: Vec<&str> = output.split('\0').collect();
    if fields.len() % FIELD_COUNT != 0 {
        return Err(parse_error(format!(
            "expected a multiple of {} fields, found {}",
            FIELD_COUNT,
            fields.len()
        )));
    }

    fields.chunks_exact(FIELD_COUNT).map(parse_record).collect()
}

fn parse_record(fields: &[&str]) -> Result<CommitInfo> {
    let &[hash, short_hash, author_name, author_email, time, parents, message] = fields else {
        return Err(parse_error(format!("expected {} fields", FIELD_COUNT)));
    };
    let hash = hash.trim();

    let seconds: i64 = time
        .parse()
        .map_err(|e| parse_error(format!("invalid timestamp '{}': {}", time, e)))?;
    let timestamp = chrono::DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| parse_error(format!("timestamp out of range: {}", seconds)))?;

    Ok(CommitInfo {
        hash: hash.to_string(),
        short_hash: short_hash.to_string(),
        message: message.to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        timestamp,
        parents: parents.split_whitespace().map(String::from).collect(),
    })
}

fn parse_error(reason: String) -> GitError {
    GitError::Parse {
        what: "git log output",
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "3f2a9c1d4e5b6a7980a1b2c3d4e5f60718293a4b";
    const CHILD: &str = "9b8c7d6e5f4a3b2c1d0e9f8a7b6c5d4e3f2a1b0c";

    fn record(hash: &str, parents: &str, subject: &str) -> String {
        format!(
            "{hash}\0{}\0Release Bot\0bot@example.com\01700000000\0{parents}\0{subject}\0",
            &hash[..7]
        )
    }

    #[test]
    fn test_parse_history_newest_first() {
        let output = record(CHILD, ROOT, "second: tweak") + &record(ROOT, "", "initial commit");
        let commits = parse_log(&output).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, CHILD);
        assert_eq!(commits[0].short_hash, "9b8c7d6");
        assert_eq!(commits[0].parents, vec![ROOT.to_string()]);
        assert_eq!(commits[0].message, "second: tweak");
        assert_eq!(commits[1].message, "initial commit");
        assert!(commits[1].parents.is_empty());
        assert_eq!(commits[1].author_name, "Release Bot");
        assert_eq!(commits[1].author_email, "bot@example.com");
        assert_eq!(commits[1].timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_merge_parents() {
        let output = record(CHILD, &format!("{ROOT} {CHILD}"), "Merge branch 'topic'");
        let commits = parse_log(&output).unwrap();
        assert_eq!(commits[0].parents.len(), 2);
    }

    #[test]
    fn test_parse_empty_history() {
        assert!(parse_log("").unwrap().is_empty());
        assert!(parse_log("\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_subject_with_control_bytes() {
        let subject = "col\x1fumn \x1e row";
        let commits = parse_log(&record(ROOT, "", subject)).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, subject);
    }

    #[test]
    fn test_parse_empty_subject() {
        let commits = parse_log(&(record(CHILD, ROOT, "") + &record(ROOT, "", "first"))).unwrap();
        assert_eq!(commits[0].message, "");
        assert_eq!(commits[1].message, "first");
    }

    #[test]
    fn test_parse_rejects_short_record() {
        let err = parse_log("abc\0def\0").unwrap_err();
        assert!(matches!(err, GitError::Parse { what: "git log output", .. }));
    }

    #[test]
    fn test_parse_rejects_bad_timestamp() {
        let output = record(ROOT, "", "subject").replace("1700000000", "yesterday");
        assert!(parse_log(&output).is_err());
    }
}
