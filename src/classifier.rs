use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MANIP_RE: Regex = Regex::new(
        r#"(?i)^\s*"?(INSERT|UPDATE|DELETE|REPLACE|CREATE|DROP|LOAD DATA|SELECT .* INTO .* FROM|COPY|ALTER|GRANT|REVOKE|LOCK|UNLOCK)\s+"#
    )
    .expect("manipulation pattern is valid");
    static ref BARE_DELETE_RE: Regex = Regex::new(r"(?i)^\s*DELETE\s+FROM\s+(\S+)\s*$")
        .expect("delete pattern is valid");
}

/// Whether `sql` changes data or schema rather than returning rows.
///
/// Classification only looks at the leading keyword; `SELECT ... INTO ... FROM` counts as
/// manipulation.
#[must_use]
pub fn is_manip(sql: &str) -> bool {
    MANIP_RE.is_match(sql)
}

/// Rewrite an unconditional `DELETE FROM t` so backends that otherwise report zero affected rows
/// return the real count.
#[must_use]
pub fn force_delete_count(sql: &str) -> Option<String> {
    BARE_DELETE_RE
        .captures(sql)
        .map(|caps| format!("DELETE FROM {} WHERE 1=1", &caps[1]))
}

/// Classifier state carried by a connection: a one-shot override plus the last verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManipTracker {
    next_is_manip: bool,
    last_was_manip: bool,
}

impl ManipTracker {
    /// Force the next classification to report manipulation, whatever the SQL looks like.
    pub fn force_next(&mut self, manip: bool) {
        self.next_is_manip = manip;
    }

    /// Classify `sql`, consuming any pending override.
    pub fn check(&mut self, sql: &str) -> bool {
        self.last_was_manip = self.next_is_manip || is_manip(sql);
        self.next_is_manip = false;
        self.last_was_manip
    }

    #[must_use]
    pub fn last_was_manip(&self) -> bool {
        self.last_was_manip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manipulation_keywords() {
        assert!(is_manip("INSERT INTO t (a) VALUES (1)"));
        assert!(is_manip("  update t SET a = 1"));
        assert!(is_manip("DELETE FROM t WHERE a = 1"));
        assert!(is_manip("CREATE TABLE t (a INT)"));
        assert!(is_manip("\"ALTER TABLE t ADD b INT"));
        assert!(is_manip("SELECT a INTO b FROM t"));
    }

    #[test]
    fn queries_are_not_manipulation() {
        assert!(!is_manip("SELECT * FROM t"));
        assert!(!is_manip("select a from t where b = 'INSERT '"));
        assert!(!is_manip("INSERT"));
    }

    #[test]
    fn override_is_one_shot() {
        let mut tracker = ManipTracker::default();
        tracker.force_next(true);
        assert!(tracker.check("SELECT 1"));
        assert!(tracker.last_was_manip());
        assert!(!tracker.check("SELECT 1"));
    }

    #[test]
    fn bare_delete_gets_where_clause() {
        assert_eq!(
            force_delete_count("DELETE FROM users").as_deref(),
            Some("DELETE FROM users WHERE 1=1")
        );
        assert_eq!(force_delete_count("DELETE FROM users WHERE id = 1"), None);
    }
}
