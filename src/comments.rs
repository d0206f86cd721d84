//! Ordering and rendering of comment histories.

use crate::tracker::record::{BugId, Comment};

/// Select and order comments for display.
///
/// Comments are taken newest first, cut to the `|limit|` most recent
/// (`0` or `None` keeps all), then flipped to oldest first when
/// `ascending` is set.
#[must_use]
pub fn view(comments: &[Comment], limit: Option<i64>, ascending: bool) -> Vec<&Comment> {
    let mut ordered: Vec<&Comment> = comments.iter().collect();
    ordered.sort_by(|a, b| b.id.cmp(&a.id));

    if let Some(limit) = limit.filter(|&n| n != 0) {
        let keep = usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX);
        ordered.truncate(keep);
    }
    if ascending {
        ordered.reverse();
    }
    ordered
}

/// Label for a comment: the description or its position.
#[must_use]
pub fn label(comment: &Comment) -> String {
    if comment.count == 0 {
        "description".to_string()
    } else {
        format!("comment: {}", comment.count)
    }
}

/// Render one bug's selected comments as a block of text.
#[must_use]
pub fn render(bug: BugId, comments: &[&Comment]) -> String {
    let body: Vec<String> = comments
        .iter()
        .map(|c| {
            format!(
                "{}\nauthor: {}\ntime: {}\n\n{}\n\n",
                label(c),
                c.creator,
                c.time.format("%Y-%m-%d %H:%M:%S UTC"),
                c.text
            )
        })
        .collect();
    format!("=====\nBUG {bug}\n\n-----\n{}", body.join("-----\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn history() -> Vec<Comment> {
        (0..5)
            .map(|n| {
                let count = u32::try_from(n).unwrap();
                Comment {
                    id: 100 + n,
                    count,
                    creator: "alice@example.org".into(),
                    time: Utc.with_ymd_and_hms(2024, 1, 1 + count, 9, 0, 0).unwrap(),
                    text: format!("text {n}"),
                }
            })
            .collect()
    }

    fn counts(view: &[&Comment]) -> Vec<u32> {
        view.iter().map(|c| c.count).collect()
    }

    #[test]
    fn limit_keeps_most_recent_newest_first() {
        let comments = history();
        assert_eq!(counts(&view(&comments, Some(2), false)), [4, 3]);
    }

    #[test]
    fn limit_keeps_most_recent_oldest_first() {
        let comments = history();
        assert_eq!(counts(&view(&comments, Some(2), true)), [3, 4]);
    }

    #[test]
    fn negative_limit_uses_magnitude() {
        let comments = history();
        assert_eq!(counts(&view(&comments, Some(-3), false)), [4, 3, 2]);
    }

    #[test]
    fn zero_or_missing_limit_keeps_everything() {
        let comments = history();
        assert_eq!(counts(&view(&comments, None, true)), [0, 1, 2, 3, 4]);
        assert_eq!(counts(&view(&comments, Some(0), false)), [4, 3, 2, 1, 0]);
    }

    #[test]
    fn ordering_follows_id_not_input_order() {
        let mut comments = history();
        comments.reverse();
        comments.swap(1, 3);
        assert_eq!(counts(&view(&comments, None, true)), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn description_is_labelled_apart() {
        let comments = history();
        let selected = view(&comments, Some(2), true);
        let text = render(BugId(9), &view(&comments, None, true));

        assert_eq!(label(&comments[0]), "description");
        assert_eq!(label(selected[0]), "comment: 3");
        let header = "=====\nBUG 9\n\n-----\ndescription\nauthor: alice@example.org\n";
        assert!(text.starts_with(header));

        assert!(text.contains("-----\ncomment: 4\n"));
        assert!(text.contains("time: 2024-01-01 09:00:00 UTC"));
    }
}
