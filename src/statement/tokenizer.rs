use super::{PlaceholderKind, PreparedStatement};

/// Split `template` on unescaped `?`, `&` and `!`.
///
/// A backslash directly before one of those characters makes it literal; the backslash is
/// dropped from the stored fragment. Nothing else is interpreted, quotes included.
#[must_use]
pub fn tokenize(template: &str) -> PreparedStatement {
    let mut fragments = Vec::new();
    let mut kinds = Vec::new();
    let mut current = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek()
                && PlaceholderKind::from_char(next).is_some()
            {
                current.push(next);
                chars.next();
                continue;
            }
            current.push(c);
        } else if let Some(kind) = PlaceholderKind::from_char(c) {
            kinds.push(kind);
            fragments.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fragments.push(current);

    PreparedStatement::new(fragments, kinds)
}
