//! Test CLI commands
#[cfg(test)]
use serial_test::serial;

#[cfg(test)]
#[serial]
mod test_cli {
    use std::process::{Command, Output};

    fn run(args: &[&str]) -> Output {
        Command::new("cargo")
            .arg("run")
            .arg("--")
            .args(args)
            .output()
            .unwrap_or_else(|err| panic!("Failed to execute: {err}"))
    }

    fn stdout(output: &Output) -> String {
        String::from_utf8(output.stdout.clone()).unwrap()
    }

    fn stderr(output: &Output) -> String {
        String::from_utf8(output.stderr.clone()).unwrap()
    }

    #[test]
    fn test_help() {
        let output = run(&["--help"]);
        assert!(
            output.status.success(),
            "Failed to execute command: stdout: {}; stderr: {}",
            stdout(&output),
            stderr(&output)
        );
    }

    #[test]
    fn test_realizable_specification() {
        let output = run(&["./tests/resources/single_output.gr1"]);

        assert!(
            output.status.success(),
            "Failed to execute command: stdout: {}; stderr: {}",
            stdout(&output),
            stderr(&output)
        );
        assert!(stderr(&output).contains("RESULT: Specification is realizable."));
        assert!(stdout(&output).contains("state 0: in[] out[o=1] goal=0"));
        assert!(stdout(&output).contains("edge 0 -> 0"));
    }

    #[test]
    fn test_only_realizability_suppresses_the_strategy() {
        let output = run(&["--onlyRealizability", "./tests/resources/single_output.gr1"]);

        assert!(output.status.success());
        assert!(stderr(&output).contains("RESULT: Specification is realizable."));
        assert!(stdout(&output).is_empty());
    }

    #[test]
    fn test_unrealizable_specification_still_exits_cleanly() {
        let output = run(&["./tests/resources/unrealizable.gr1"]);

        assert!(
            output.status.success(),
            "Unrealizability is a result, not an error: stderr: {}",
            stderr(&output)
        );
        assert!(stderr(&output).contains("RESULT: Specification is not realizable."));
        assert!(stdout(&output).is_empty());
    }

    #[test]
    fn test_request_grant_specification() {
        let output = run(&["./tests/resources/request_grant.gr1"]);

        assert!(output.status.success());
        assert!(stderr(&output).contains("RESULT: Specification is realizable."));
        assert!(stdout(&output).contains("goal=0"));
        assert!(stdout(&output).contains("edge"));
    }

    #[test]
    fn test_unknown_section_is_a_parse_error() {
        let output = run(&["./tests/resources/bogus_section.gr1"]);

        assert!(!output.status.success());
        assert!(stderr(&output).contains("[BOGUS]"));
    }

    #[test]
    fn test_missing_input_file_fails() {
        let output = run(&["./tests/resources/does_not_exist.gr1"]);

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Cannot open input file"));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let output = run(&["--frobnicate", "./tests/resources/single_output.gr1"]);
        assert!(!output.status.success());
    }

    #[test]
    fn test_extra_positional_argument_is_rejected() {
        let output = run(&[
            "./tests/resources/single_output.gr1",
            "./tests/resources/unrealizable.gr1",
        ]);
        assert!(!output.status.success());
    }
}
