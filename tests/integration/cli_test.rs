use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn consensus() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("consensus").unwrap();
    cmd.env_remove("CONSENSUS_SHARE_URL");
    cmd.env_remove("CONSENSUS_LOG");
    cmd
}

fn init_store() -> TempDir {
    let dir = TempDir::new().unwrap();
    consensus().arg("init").current_dir(dir.path()).assert().success();
    dir
}

/// Create a decision and return its id.
fn new_decision(dir: &TempDir, title: &str) -> String {
    let output = consensus()
        .args(["--json", "new", title])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    value["decision"]["id"].as_str().unwrap().to_string()
}

fn show_json(dir: &TempDir) -> Value {
    let output = consensus()
        .args(["--json", "show"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn init_creates_store_dir() {
    let dir = TempDir::new().unwrap();
    consensus()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(".consensus"));

    assert!(dir.path().join(".consensus").exists());
    assert!(dir.path().join(".consensus/config.json").exists());
    assert!(dir.path().join(".consensus/decisions").exists());
}

#[test]
fn init_twice_fails() {
    let dir = init_store();
    consensus()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn commands_outside_store_fail() {
    let dir = TempDir::new().unwrap();
    consensus()
        .arg("show")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("consensus init"));
}

#[test]
fn show_without_decision_lists_nothing() {
    let dir = init_store();
    consensus()
        .arg("show")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No decision open"))
        .stdout(predicate::str::contains("No previous decisions."));
}

#[test]
fn new_prints_id_and_share_link() {
    let dir = init_store();
    consensus()
        .args(["new", "Where to eat"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created decision"))
        .stdout(predicate::str::contains("Share: http://localhost:3000?id="));
}

#[test]
fn new_rejects_blank_title() {
    let dir = init_store();
    consensus()
        .args(["new", "   "])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn new_decision_has_defaults() {
    let dir = init_store();
    new_decision(&dir, "Where to eat");

    let value = show_json(&dir);
    assert_eq!(value["decision"]["title"], "Where to eat");
    assert_eq!(value["decision"]["user_count"], 1);
    assert_eq!(value["decision"]["max_score"], 10);
    assert_eq!(value["decision"]["veto_enabled"], false);
    assert_eq!(value["decision"]["version"], 1);
    assert_eq!(value["decision"]["options"].as_array().unwrap().len(), 0);
    assert!(value["winner"].is_null());
}

#[test]
fn show_empty_decision_hints_at_options() {
    let dir = init_store();
    new_decision(&dir, "Where to eat");
    consensus()
        .arg("show")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:     Where to eat"))
        .stdout(predicate::str::contains("No options yet"));
}

#[test]
fn option_add_edit_remove() {
    let dir = init_store();
    new_decision(&dir, "Lunch");

    consensus()
        .args(["option", "add", "  Pizza  "])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 Pizza"))
        .stdout(predicate::str::contains("User 1 resistance: 0"));

    consensus()
        .args(["option", "add", "Sushi"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("#2 Sushi"));

    consensus()
        .args(["option", "edit", "#2", "Ramen"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("#2 Ramen"));

    consensus()
        .args(["option", "rm", "#1"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 Ramen"))
        .stdout(predicate::str::contains("Pizza").not());

    let value = show_json(&dir);
    let options = value["decision"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0]["text"], "Ramen");
    assert_eq!(value["decision"]["version"], 5);
}

#[test]
fn option_blank_edit_changes_nothing() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .success();

    consensus()
        .args(["option", "edit", "#1", "   "])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing changed."))
        .stdout(predicate::str::contains("#1 Pizza"));
}

#[test]
fn option_position_out_of_range_fails() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["option", "rm", "#3"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no option at position 3"));
}

#[test]
fn option_by_raw_id() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .success();

    let value = show_json(&dir);
    let id = value["decision"]["options"][0]["id"].as_i64().unwrap();

    consensus()
        .args(["option", "edit", &id.to_string(), "Calzone"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 Calzone"));
}

#[test]
fn scores_are_clamped() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .success();

    consensus()
        .args(["score", "#1", "1", "99"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("User 1 resistance: 10"));

    consensus()
        .args(["score", "#1", "1", "-3"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("User 1 resistance: 0"));
}

#[test]
fn score_rejects_unknown_user() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .success();

    for user in ["0", "2"] {
        consensus()
            .args(["score", "#1", user, "4"])
            .current_dir(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("user must be between 1 and 1"));
    }
}

#[test]
fn lowest_total_resistance_wins() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus().args(["users", "2"]).current_dir(dir.path()).assert().success();
    for text in ["Pizza", "Sushi"] {
        consensus()
            .args(["option", "add", text])
            .current_dir(dir.path())
            .assert()
            .success();
    }
    for (option, user, score) in [("#1", "1", "6"), ("#1", "2", "5"), ("#2", "1", "3"), ("#2", "2", "4")] {
        consensus()
            .args(["score", option, user, score])
            .current_dir(dir.path())
            .assert()
            .success();
    }

    consensus()
        .arg("show")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total resistance: 11"))
        .stdout(predicate::str::contains("Total resistance: 7"))
        .stdout(predicate::str::contains("Winning option: Sushi (total resistance 7)"));

    let value = show_json(&dir);
    let sushi = value["decision"]["options"][1]["id"].clone();
    assert_eq!(value["winner"], sushi);
    assert_eq!(value["tally"][1]["is_winner"], true);
}

#[test]
fn ties_go_to_the_first_option() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    for text in ["Pizza", "Sushi"] {
        consensus()
            .args(["option", "add", text])
            .current_dir(dir.path())
            .assert()
            .success();
    }
    consensus()
        .arg("show")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Winning option: Pizza"));
}

#[test]
fn changing_users_resizes_scores() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .success();

    consensus()
        .args(["users", "3"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("User 3 resistance: 0"));

    consensus()
        .args(["users", "1"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("User 2").not());

    consensus()
        .args(["users", "0"])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn lowering_max_score_clamps_existing_scores() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .success();
    consensus()
        .args(["score", "#1", "1", "8"])
        .current_dir(dir.path())
        .assert()
        .success();

    consensus()
        .args(["max-score", "5"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Max score: 5"))
        .stdout(predicate::str::contains("User 1 resistance: 5"));
}

#[test]
fn veto_highlights_max_scores() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .success();
    consensus()
        .args(["score", "#1", "1", "10"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(VETO)").not());

    consensus()
        .arg("veto")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Veto:      on"))
        .stdout(predicate::str::contains("User 1 resistance: 10 (VETO)"))
        .stdout(predicate::str::contains("Winning option: Pizza"));

    consensus()
        .arg("veto")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Veto:      off"));
}

#[test]
fn title_rename_updates_recents() {
    let dir = init_store();
    let id = new_decision(&dir, "Lunch");

    consensus()
        .args(["title", "Friday lunch"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:     Friday lunch"));

    consensus()
        .args(["recents", "list"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(&id))
        .stdout(predicate::str::contains("Friday lunch"))
        .stdout(predicate::str::contains("Created on"));
}

#[test]
fn share_prints_link() {
    let dir = init_store();
    let id = new_decision(&dir, "Lunch");
    consensus()
        .arg("share")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("http://localhost:3000?id={}", id)));
}

#[test]
fn share_url_env_override() {
    let dir = init_store();
    let id = new_decision(&dir, "Lunch");
    consensus()
        .arg("share")
        .env("CONSENSUS_SHARE_URL", "https://vote.example")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("https://vote.example?id={}", id)));
}

#[test]
fn share_copy_without_terminal_still_prints_link() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["share", "--copy"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("?id="))
        .stdout(predicate::str::contains("Link copied").not());
}

#[test]
fn open_by_share_link_and_home() {
    let dir = init_store();
    let first = new_decision(&dir, "Lunch");
    new_decision(&dir, "Dinner");

    consensus()
        .args(["open", &format!("https://vote.example/?id={}", first)])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:     Lunch"));

    consensus()
        .arg("home")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No decision open."))
        .stdout(predicate::str::contains("Previous decisions:"))
        .stdout(predicate::str::contains("Dinner"));

    consensus()
        .arg("show")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No decision open"));
}

#[test]
fn open_missing_decision_fails_until_home() {
    let dir = init_store();
    let missing = "0123456789abcdef0123456789abcdef";

    consensus()
        .args(["open", missing])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("consensus home"));

    consensus()
        .arg("show")
        .current_dir(dir.path())
        .assert()
        .failure();

    consensus().arg("home").current_dir(dir.path()).assert().success();
    consensus().arg("show").current_dir(dir.path()).assert().success();
}

#[test]
fn open_rejects_garbage() {
    let dir = init_store();
    consensus()
        .args(["open", "not-a-decision"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a decision id or share link"));
}

#[test]
fn edits_without_open_decision_fail() {
    let dir = init_store();
    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no decision is open"));
}

#[test]
fn recents_newest_first_remove_and_clear() {
    let dir = init_store();
    let lunch = new_decision(&dir, "Lunch");
    let dinner = new_decision(&dir, "Dinner");

    let output = consensus()
        .args(["--json", "recents", "list"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    let entries: Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], dinner.as_str());
    assert_eq!(entries[1]["id"], lunch.as_str());
    assert!(entries[0]["createdAt"].is_string());

    consensus()
        .args(["recents", "remove", &dinner])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    consensus()
        .args(["recents", "remove", &dinner])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is not in recent decisions"));

    consensus().args(["recents", "clear"]).current_dir(dir.path()).assert().success();
    consensus()
        .args(["recents", "list"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No previous decisions."));

    // The decisions themselves stay in the store.
    consensus()
        .arg("list")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Lunch"))
        .stdout(predicate::str::contains("Dinner"));
}

#[test]
fn list_sorted_by_title() {
    let dir = init_store();
    consensus()
        .arg("list")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No decisions in this store."));

    new_decision(&dir, "Zoo trip");
    new_decision(&dir, "Apple picking");

    let output = consensus()
        .args(["--json", "list"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    let entries: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries[0]["title"], "Apple picking");
    assert_eq!(entries[1]["title"], "Zoo trip");
}

#[test]
fn watch_stops_after_iterations() {
    let dir = init_store();
    new_decision(&dir, "Lunch");
    consensus()
        .args(["watch", "--iterations", "1"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:     Lunch"));
}

#[test]
fn quiet_conflicts_with_verbose() {
    let dir = init_store();
    consensus()
        .args(["-q", "-v", "show"])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn stale_lock_error_names_the_lock_file() {
    let dir = init_store();
    let id = new_decision(&dir, "Lunch");
    let lock = dir
        .path()
        .join(".consensus/decisions")
        .join(format!("{}.json.lock", id));
    std::fs::write(&lock, "").unwrap();

    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!("{}.json.lock", id)))
        .stderr(predicate::str::contains("delete that file"));

    std::fs::remove_file(&lock).unwrap();
    consensus()
        .args(["option", "add", "Pizza"])
        .current_dir(dir.path())
        .assert()
        .success();
}
