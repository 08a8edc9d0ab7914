use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("dossier").unwrap()
}

fn project_with_sources(sources: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("search_results");
    fs::create_dir_all(&data).unwrap();
    for (file, contents) in sources {
        fs::write(data.join(file), contents).unwrap();
    }
    dir
}

#[test]
fn build_writes_every_document() {
    let dir = project_with_sources(&[("stripe_api.json", r#"{"extracted_information": "Payments."}"#)]);
    cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(contains("gateways:"))
        .stdout(contains("Build finished"));

    assert!(dir.path().join("docs/payment_gateway_analysis.md").exists());
    assert!(dir.path().join("docs/comprehensive_billing_system_research.md").exists());
    assert!(dir.path().join("design/comprehensive_billing_system_design.md").exists());
    assert!(dir.path().join("design/system_architecture_diagram.md").exists());
}

#[test]
fn build_reports_undecodable_sources() {
    let dir = project_with_sources(&[
        ("btcpay_api.json", "{ not json"),
        ("stripe_api.json", r#"{"extracted_information": "Payments."}"#),
    ]);
    cmd()
        .arg("--root")
        .arg(dir.path())
        .args(["build", "--no-diagram"])
        .assert()
        .success()
        .stdout(contains("btcpay_api.json"))
        .stdout(contains("1 undecodable source(s)"));

    let gateways = fs::read_to_string(dir.path().join("docs/payment_gateway_analysis.md")).unwrap();
    assert!(gateways.contains("## Stripe"));
    assert!(!dir.path().join("design/system_architecture_diagram.md").exists());
}

#[test]
fn compile_single_job() {
    let dir = project_with_sources(&[(
        "ui_ux_trends_bizbot.json",
        r#"{"features": [{"tip_number": 1, "title": "Keep it simple"}]}"#,
    )]);
    cmd()
        .arg("--root")
        .arg(dir.path())
        .args(["compile", "ui_ux"])
        .assert()
        .success()
        .stdout(contains("1 rendered, 2 missing, 0 failed"));

    let out = fs::read_to_string(dir.path().join("docs/ui_ux_trends.md")).unwrap();
    assert!(out.contains("**1. Keep it simple**"));
    assert!(!dir.path().join("docs/tax_compliance.md").exists());
}

#[test]
fn compile_unknown_job_fails() {
    let dir = project_with_sources(&[]);
    cmd()
        .arg("--root")
        .arg(dir.path())
        .args(["compile", "astrology"])
        .assert()
        .failure()
        .stderr(contains("astrology"));
}

#[test]
fn missing_root_fails() {
    cmd()
        .args(["--root", "/nonexistent/dossier-root", "build"])
        .assert()
        .failure()
        .stderr(contains("Error:"));
}

#[test]
fn assemble_and_diagram() {
    let dir = project_with_sources(&[]);
    let docs = dir.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("tax_compliance.md"), "# Tax\n\nBody.\n").unwrap();

    cmd()
        .arg("--root")
        .arg(dir.path())
        .args(["assemble", "research"])
        .assert()
        .success()
        .stdout(contains("1 included, 5 missing"));

    cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("diagram")
        .assert()
        .success()
        .stdout(contains("Diagram written to:"));

    let diagram = fs::read_to_string(dir.path().join("design/system_architecture_diagram.md")).unwrap();
    assert!(diagram.contains("subgraph Data_Stores [Data Stores]"));
}

#[test]
fn config_in_root_is_picked_up() {
    let dir = project_with_sources(&[("acme.json", r#"{"extracted_information": "Anvils."}"#)]);
    fs::write(
        dir.path().join("dossier.toml"),
        r#"
reports = []

[[jobs]]
name = "vendors"
title = "Vendors"
output = "out/vendors.md"
sources = [{ file = "acme.json" }]

[diagram]
enabled = false
"#,
    )
    .unwrap();

    cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(contains("vendors:"));

    let out = fs::read_to_string(dir.path().join("out/vendors.md")).unwrap();
    assert_eq!(out, "# Vendors\n\n## Acme\n\nAnvils.\n\n");
}

#[test]
fn list_shows_manifest() {
    cmd()
        .args(["--config", "/nonexistent/dossier.toml", "list"])
        .assert()
        .failure();

    let dir = TempDir::new().unwrap();
    cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("gateways -> docs/payment_gateway_analysis.md (7 sources)"))
        .stdout(contains("hst_requirements_detailed.json [tax]"))
        .stdout(contains("Policies: architecture, gateway, generic, security, standards, tax, ui_ux"));
}

#[test]
fn version() {
    cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}
