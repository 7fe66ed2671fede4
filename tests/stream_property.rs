// tests/stream_property.rs
#![cfg(unix)]

use std::fs;

use proptest::prelude::*;

use ciwrap::exec::stream::run_streaming_to;
use ciwrap::exec::CommandSpec;

/// A child printing each line on its own, to stderr when flagged.
fn print_lines(lines: &[(bool, String)]) -> CommandSpec {
    CommandSpec::new("sh")
        .arg("-c")
        .arg(
            r#"for l in "$@"; do
  case "$l" in
    e:*) printf '%s\n' "${l#e:}" 1>&2 ;;
    *) printf '%s\n' "${l#o:}" ;;
  esac
done"#,
        )
        .arg("sh")
        .args(
            lines
                .iter()
                .map(|(to_stderr, l)| format!("{}:{l}", if *to_stderr { "e" } else { "o" })),
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn capture_equals_concatenated_lines(
        lines in proptest::collection::vec((any::<bool>(), "[a-zA-Z0-9 .:_=-]{0,40}"), 0..40)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let capture = tmp.path().join("capture.txt");
        let mut console: Vec<u8> = Vec::new();

        let outcome = rt
            .block_on(run_streaming_to(&print_lines(&lines), &capture, &mut console))
            .unwrap();

        let expected: String = lines.iter().map(|(_, l)| format!("{l}\n")).collect();
        prop_assert_eq!(outcome.exit_code, 0);
        prop_assert_eq!(fs::read_to_string(&capture).unwrap(), expected.clone());
        prop_assert_eq!(String::from_utf8(console).unwrap(), expected);
    }
}
