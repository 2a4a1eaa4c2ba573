use assert_cmd::Command;

/// Helper to get a Command for the pathguard binary.
#[allow(deprecated)]
fn pathguard_cmd() -> Command {
    Command::cargo_bin("pathguard").unwrap()
}

#[test]
fn help_works() {
    pathguard_cmd().arg("--help").assert().success();
}

#[test]
fn scan_help_works() {
    pathguard_cmd().args(["scan", "--help"]).assert().success();
}

#[test]
fn scan_requires_an_item_file() {
    pathguard_cmd().arg("scan").assert().failure();
}
