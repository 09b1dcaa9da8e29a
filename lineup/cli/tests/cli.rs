use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONSOLE_PAGE: &str = r#"<html><body><div class="language-console highlighter-rouge"><div class="highlight"><pre class="highlight"><code><span class="gp">$ </span>ls
<span class="go">file.txt</span>
<span class="gp">$ </span>pwd
</code></pre></div></div><pre data-variant="legacy">keep</pre></body></html>"#;

/// Helper to get the lineup binary command
fn lineup_cmd() -> Command {
    Command::cargo_bin("lineup").unwrap()
}

mod enhance_mode {
    use super::*;

    #[test]
    fn enhances_stdin_to_stdout() {
        lineup_cmd()
            .write_stdin("<pre>a\nb</pre>")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"id="codeblock-0-LC2""#))
            .stdout(predicate::str::contains("code-block-processed"));
    }

    #[test]
    fn dash_reads_stdin() {
        lineup_cmd()
            .arg("-")
            .write_stdin("<pre>x</pre>")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"id="codeblock-0""#));
    }

    #[test]
    fn writes_output_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        let output = dir.path().join("out.html");
        fs::write(&input, CONSOLE_PAGE).unwrap();

        lineup_cmd()
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains(r#"class="code-line-prompt""#));
        assert!(html.contains(r#"data-copy-kind="console""#));
    }

    #[test]
    fn flags_override_defaults() {
        lineup_cmd()
            .args(["--prefix", "snippet", "--color-mode", "dark", "--default-variant", "no-line-numbers"])
            .write_stdin("<pre>a\nb</pre>")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"id="snippet-0""#))
            .stdout(predicate::str::contains("theme-dark"))
            .stdout(predicate::str::contains("code-line-number").not());
    }

    #[test]
    fn config_file_is_applied_before_flags() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("lineup.toml");
        fs::write(&config, "id_prefix = \"from-config\"\ndefault_variant = \"legacy\"\n").unwrap();

        lineup_cmd()
            .arg("--config")
            .arg(&config)
            .args(["--default-variant", "enhanced"])
            .write_stdin("<pre>a\nb</pre>")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"id="from-config-0""#));
    }

    #[test]
    fn rejects_unknown_variant() {
        lineup_cmd()
            .args(["--default-variant", "sparkly"])
            .write_stdin("<pre>a</pre>")
            .assert()
            .failure();
    }

    #[test]
    fn reports_bad_config() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("bad.toml");
        fs::write(&config, "default_variant = 3").unwrap();

        lineup_cmd()
            .arg("--config")
            .arg(&config)
            .write_stdin("<pre>a</pre>")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to load config"));
    }

    #[test]
    fn missing_input_file_fails() {
        lineup_cmd()
            .arg("/definitely/not/here.html")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read"));
    }
}

mod report_mode {
    use super::*;

    #[test]
    fn prints_json_report_to_stderr() {
        let output = lineup_cmd()
            .arg("--report")
            .write_stdin(CONSOLE_PAGE)
            .output()
            .expect("Failed to execute");

        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
        assert_eq!(report["enhanced"], serde_json::json!(["codeblock-0"]));
        assert_eq!(report["retained"], 1);
        assert_eq!(report["skipped"], serde_json::json!([]));
    }
}

mod copy_mode {
    use super::*;

    #[test]
    fn console_copy_skips_prompts_and_output() {
        lineup_cmd()
            .args(["--copy", "0"])
            .write_stdin(CONSOLE_PAGE)
            .assert()
            .success()
            .stdout("ls\npwd\n");
    }

    #[test]
    fn default_copy_keeps_every_non_empty_line() {
        lineup_cmd()
            .args(["--copy", "0"])
            .write_stdin("<pre><code>one\n\ntwo\n</code></pre>")
            .assert()
            .success()
            .stdout("one\ntwo\n");
    }

    #[test]
    fn osc52_writes_escape_sequence() {
        lineup_cmd()
            .args(["--copy", "0", "--osc52"])
            .write_stdin(CONSOLE_PAGE)
            .assert()
            .success()
            .stdout("\x1b]52;c;bHMKcHdk\x07");
    }

    #[test]
    fn unknown_block_fails() {
        lineup_cmd()
            .args(["--copy", "7"])
            .write_stdin(CONSOLE_PAGE)
            .assert()
            .failure()
            .stderr(predicate::str::contains("No enhanced block with id `codeblock-7`"));
    }

    #[test]
    fn osc52_requires_copy() {
        lineup_cmd()
            .arg("--osc52")
            .write_stdin(CONSOLE_PAGE)
            .assert()
            .failure();
    }
}

mod completions {
    use super::*;

    #[test]
    fn generates_bash_completions() {
        lineup_cmd()
            .env("COMPLETE", "bash")
            .assert()
            .success()
            .stdout(predicate::str::contains("lineup"));
    }

    #[test]
    fn rejects_unknown_shell() {
        lineup_cmd()
            .env("COMPLETE", "tcsh")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown shell"));
    }
}
