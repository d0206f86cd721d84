//! Commands run end to end against replayed tracker, UI and editor traffic.
//!
//! Each test builds a cassette in memory, replays it through
//! `ServiceContext::from_cassette`, and checks both the shown output and
//! which calls were made. Replay is strict: a call the cassette does not
//! hold panics, so an untouched bug is proven by its absence.

use serde_json::{json, Value};

use bugz::cassette::recorder::CassetteRecorder;
use bugz::commands::App;
use bugz::config::Config;
use bugz::context::ServiceContext;
use bugz::Error;

type Call<'a> = (&'a str, &'a str, Value, Value);

fn context(calls: &[Call<'_>]) -> ServiceContext {
    let mut recorder = CassetteRecorder::new(
        "unused.cassette.yaml",
        "replay-test",
        "https://bugs.example.org/",
    );
    for (port, method, input, output) in calls {
        recorder.record(*port, *method, input.clone(), output.clone());
    }
    ServiceContext::from_cassette(&recorder.into_cassette())
}

fn run(ctx: &ServiceContext, args: &[&str]) -> Result<(), Error> {
    let app = App::new(Config::default()).unwrap();
    app.run_with(std::iter::once("bugz").chain(args.iter().copied()), ctx)
}

fn fields() -> Value {
    json!({"Ok": [
        {"name": "summary", "display_name": "Summary"},
        {"name": "blocks", "display_name": "Blocks"},
        {"name": "dependson", "display_name": "Depends on"},
        {
            "name": "bug_status",
            "display_name": "Status",
            "values": [
                {"name": "NEW", "sort_key": 1, "is_open": true},
                {"name": "RESOLVED", "sort_key": 2, "is_open": false}
            ]
        },
        {
            "name": "resolution",
            "display_name": "Resolution",
            "values": [{"name": "FIXED", "sort_key": 1}]
        }
    ]})
}

fn bug(id: u32, blocks: &[u32]) -> Value {
    json!({"Ok": {
        "id": id,
        "summary": format!("bug {id}"),
        "status": "NEW",
        "is_open": true,
        "blocks": blocks
    }})
}

#[test]
fn batch_stops_at_first_rejected_bug() {
    let ctx = context(&[
        ("tracker", "fields", Value::Null, fields()),
        ("tracker", "get_bug", json!({"id": 1}), bug(1, &[])),
        ("tracker", "get_bug", json!({"id": 2}), bug(2, &[])),
        (
            "tracker",
            "update_bug",
            json!({"id": 1, "update": {"blocks": {"add": [9], "remove": []}}}),
            json!({"Ok": null}),
        ),
        (
            "tracker",
            "update_bug",
            json!({"id": 2, "update": {"blocks": {"add": [9], "remove": []}}}),
            json!({"Err": "You are not allowed to edit bug 2."}),
        ),
    ]);

    let err = run(&ctx, &["block", "1", "2", "3", "--add", "9"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "bug 2: update blocked bugs: You are not allowed to edit bug 2."
    );
}

#[test]
fn set_replaces_the_list() {
    let ctx = context(&[
        ("tracker", "fields", Value::Null, fields()),
        ("tracker", "get_bug", json!({"id": 1}), bug(1, &[4, 5])),
        (
            "tracker",
            "update_bug",
            json!({"id": 1, "update": {"blocks": {"add": [7], "remove": [4, 5]}}}),
            json!({"Ok": null}),
        ),
    ]);

    run(&ctx, &["block", "1", "--set", "7", "--add", "4"]).unwrap();
}

#[test]
fn empty_change_shows_current_lists() {
    let ctx = context(&[
        ("tracker", "fields", Value::Null, fields()),
        ("tracker", "get_bug", json!({"id": 1}), bug(1, &[])),
        ("tracker", "get_bug", json!({"id": 2}), bug(2, &[8, 3])),
    ]);

    run(&ctx, &["block", "1", "2"]).unwrap();
    assert_eq!(
        ctx.transcript(),
        ["Bug 1:", "  No blocked bugs", "Bug 2:", "  Blocked bugs: 3, 8"]
    );
}

#[test]
fn invalid_status_changes_nothing() {
    // No get_bug or update_bug in the cassette: any such call panics.
    let ctx = context(&[("tracker", "fields", Value::Null, fields())]);

    let err = run(&ctx, &["status", "1", "2", "--status", "badstatus"]).unwrap_err();
    assert_eq!(err.to_string(), "invalid status: BADSTATUS");
}

#[test]
fn closing_open_bugs_prompts_for_resolution_once() {
    let update = |id: u32| {
        json!({
            "id": id,
            "update": {"status": "RESOLVED", "resolution": "FIXED", "comment": {"body": "done"}}
        })
    };
    let ctx = context(&[
        ("tracker", "fields", Value::Null, fields()),
        ("tracker", "get_bug", json!({"id": 1}), bug(1, &[])),
        (
            "ui",
            "choose",
            json!({"prompt": "Choose a resolution", "options": ["FIXED"]}),
            json!({"Ok": "FIXED"}),
        ),
        ("tracker", "update_bug", update(1), json!({"Ok": null})),
        ("tracker", "update_bug", update(2), json!({"Ok": null})),
    ]);

    run(
        &ctx,
        &["status", "1", "2", "--status", "resolved", "-m", "done"],
    )
    .unwrap();
}

#[test]
fn duplicate_ignores_status_and_resolution() {
    let update = |id: u32| {
        json!({"id": id, "update": {"dupe_of": 3, "comment": {"body": "same crash"}}})
    };
    let ctx = context(&[
        ("tracker", "update_bug", update(4), json!({"Ok": null})),
        ("tracker", "update_bug", update(5), json!({"Ok": null})),
    ]);

    run(
        &ctx,
        &["status", "4", "5", "--status", "bogus", "--dupe-of", "3", "-m", "same crash"],
    )
    .unwrap();
}

#[test]
fn comments_are_limited_and_newest_first() {
    let history = json!({"Ok": [
        {"id": 100, "count": 0, "creator": "alice@example.org",
         "time": "2024-01-01T09:00:00Z", "text": "first"},
        {"id": 101, "count": 1, "creator": "bob@example.org",
         "time": "2024-01-02T09:00:00Z", "text": "second"},
        {"id": 102, "count": 2, "creator": "bob@example.org",
         "time": "2024-01-03T09:00:00Z", "text": "third"}
    ]});
    let ctx = context(&[("tracker", "comments", json!({"id": 7}), history)]);

    run(&ctx, &["comment", "7", "--limit", "2"]).unwrap();
    assert_eq!(
        ctx.transcript(),
        ["=====\nBUG 7\n\n-----\n\
          comment: 2\nauthor: bob@example.org\ntime: 2024-01-03 09:00:00 UTC\n\nthird\n\n\
          -----\n\
          comment: 1\nauthor: bob@example.org\ntime: 2024-01-02 09:00:00 UTC\n\nsecond\n\n"]
    );
}

#[test]
fn interactive_message_comes_from_the_editor() {
    let ctx = context(&[
        (
            "editor",
            "input",
            Value::Null,
            json!({"Ok": "taking this one"}),
        ),
        (
            "tracker",
            "add_comment",
            json!({"id": 3, "text": "taking this one"}),
            json!({"Ok": null}),
        ),
    ]);

    run(&ctx, &["comment", "3", "-m"]).unwrap();
}

#[test]
fn empty_editor_message_means_no_comment() {
    let ctx = context(&[
        ("editor", "input", Value::Null, json!({"Ok": "  \n"})),
        (
            "tracker",
            "update_bug",
            json!({"id": 3, "update": {"assigned_to": "alice@example.org"}}),
            json!({"Ok": null}),
        ),
    ]);

    run(&ctx, &["assign", "3", "--to", "alice@example.org", "-m"]).unwrap();
}

#[test]
fn list_aligns_summaries() {
    let ctx = context(&[
        ("tracker", "fields", Value::Null, fields()),
        ("tracker", "get_bug", json!({"id": 9}), bug(9, &[])),
        ("tracker", "get_bug", json!({"id": 120}), bug(120, &[])),
    ]);

    run(&ctx, &["list", "9", "120"]).unwrap();
    assert_eq!(ctx.transcript(), ["Bug 9:   bug 9", "Bug 120: bug 120"]);
}

#[test]
#[should_panic(expected = "Cassette exhausted")]
fn bug_reads_need_field_metadata() {
    let ctx = context(&[("tracker", "get_bug", json!({"id": 1}), bug(1, &[]))]);
    let _ = run(&ctx, &["list", "1"]);
}

#[test]
fn info_shows_configured_fields_aligned() {
    let ctx = context(&[
        ("tracker", "fields", Value::Null, fields()),
        ("tracker", "get_bug", json!({"id": 1}), bug(1, &[4, 2])),
    ]);
    let config = Config::parse("show_fields: [summary, status, blocks, no_such_field]\n").unwrap();
    let app = App::new(config).unwrap();

    app.run_with(["bugz", "info", "1"], &ctx).unwrap();
    assert_eq!(
        ctx.transcript(),
        ["Bug 1:", "  summary: bug 1", "  status:  NEW", "  blocks:  4, 2", ""]
    );
}

#[test]
fn unmatched_cc_user_stops_before_any_bug_is_read() {
    // No get_bug or update_bug in the cassette: any such call panics.
    let ctx = context(&[
        (
            "tracker",
            "match_users",
            json!({"query": "alice"}),
            json!({"Ok": [{"name": "alice@example.org"}]}),
        ),
        (
            "tracker",
            "match_users",
            json!({"query": "ghost"}),
            json!({"Ok": []}),
        ),

    ]);

    let err = run(&ctx, &["cc", "1", "2", "--add", "alice", "ghost"]).unwrap_err();
    assert_eq!(err.to_string(), "no users matching 'ghost'");
}

#[test]
fn cc_removal_sends_resolved_login() {
    let ctx = context(&[
        (
            "tracker",
            "match_users",
            json!({"query": "bob"}),
            json!({"Ok": [{"name": "bob@example.org"}]}),
        ),
        ("tracker", "fields", Value::Null, fields()),
        (
            "tracker",
            "get_bug",
            json!({"id": 1}),
            json!({"Ok": {"id": 1, "cc": ["bob@example.org", "carol@example.org"]}}),
        ),
        (
            "tracker",
            "update_bug",
            json!({"id": 1, "update": {"cc": {"add": [], "remove": ["bob@example.org"]}}}),
            json!({"Ok": null}),
        ),
    ]);

    run(&ctx, &["cc", "1", "--remove", "bob"]).unwrap();
}

#[test]
fn depend_removes_an_id_both_added_and_removed() {
    let update = |id: u32| {
        json!({
            "id": id,
            "update": {"depends_on": {"add": [], "remove": [3]}, "comment": {"body": "hi"}}
        })
    };
    let depends = |id: u32| {
        json!({"Ok": {"id": id, "summary": format!("bug {id}"), "depends_on": [3, 5]}})
    };
    let ctx = context(&[
        ("tracker", "fields", Value::Null, fields()),
        ("tracker", "get_bug", json!({"id": 1}), depends(1)),
        ("tracker", "get_bug", json!({"id": 2}), depends(2)),
        ("tracker", "update_bug", update(1), json!({"Ok": null})),
        ("tracker", "update_bug", update(2), json!({"Ok": null})),
    ]);

    run(
        &ctx,
        &["depend", "1", "2", "--add", "3", "--remove", "3", "-m", "hi"],
    )
    .unwrap();
}

#[test]
fn status_batch_stops_at_first_rejected_bug() {
    let update = |id: u32| {
        json!({"id": id, "update": {"status": "RESOLVED", "resolution": "FIXED"}})
    };
    // Bug 3 has no update in the cassette; reaching it would panic.
    let ctx = context(&[
        ("tracker", "fields", Value::Null, fields()),
        ("tracker", "update_bug", update(1), json!({"Ok": null})),
        (
            "tracker",
            "update_bug",
            update(2),
            json!({"Err": "Bug 2 is already RESOLVED."}),
        ),
    ]);

    let err = run(
        &ctx,
        &["status", "1", "2", "3", "--status", "RESOLVED", "--resolution", "FIXED"],
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "bug 2: set status: Bug 2 is already RESOLVED."
    );

}

#[test]
fn status_comment_is_asked_for_before_the_status() {
    // No fields interaction: planning the status first would panic.
    let ctx = context(&[(
        "editor",
        "input",
        Value::Null,
        json!({"Err": "editor exited with status 1"}),
    )]);

    let err = run(&ctx, &["status", "1", "--status", "bogus", "-m"]).unwrap_err();
    assert_eq!(err.to_string(), "editor: editor exited with status 1");
}
