use proptest::prelude::*;
use tempfile::TempDir;

use eventlog::logger::{EventLogger, StdoutEventLogger, TextfileEventLogger, format_line};

#[derive(Debug, Clone)]
enum Toggle {
    Enable,
    Disable,
}

fn toggle_strategy() -> impl Strategy<Value = Toggle> {
    prop_oneof![Just(Toggle::Enable), Just(Toggle::Disable)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn tail_returns_last_k_appended_lines(
        messages in prop::collection::vec("[a-zA-Z0-9 .:-]{1,60}", 1..40),
        k in 1usize..60,
    ) {
        let tmp = TempDir::new().expect("tmp");
        let log = TextfileEventLogger::open(tmp.path().join("p.log"), false).expect("open");

        let written: Vec<String> = messages
            .iter()
            .map(|m| log.add_with_address("127.0.0.1", m))
            .collect();

        let tail = log.tail_last_n(k);
        if k <= written.len() {
            prop_assert_eq!(tail, written[written.len() - k..].to_vec());
        } else {
            prop_assert_eq!(tail.len(), written.len() + 1);
            prop_assert_eq!(tail[1..].to_vec(), written);
        }
    }

    #[test]
    fn address_gets_exactly_one_paren_pair(
        address in "[()a-z0-9.:]{0,24}",
        message in "[a-z0-9 ]{0,24}",
    ) {
        let line = format_line(1_700_000_000_000, &address, &message);
        prop_assert_eq!(line.matches('(').count(), 1);
        prop_assert_eq!(line.matches(')').count(), 1);

        let stripped: String = address.chars().filter(|c| *c != '(' && *c != ')').collect();
        let wrapped = format!("({stripped})");
        prop_assert!(line.contains(&wrapped));
    }

    #[test]
    fn only_last_toggle_decides_activity(toggles in prop::collection::vec(toggle_strategy(), 1..20)) {
        let log = StdoutEventLogger::with_writer(Vec::<u8>::new());
        for t in &toggles {
            match t {
                Toggle::Enable => log.enable(),
                Toggle::Disable => log.disable(),
            }
        }
        let expect_active = matches!(toggles.last(), Some(Toggle::Enable));
        prop_assert_eq!(log.is_active(), expect_active);
        prop_assert_eq!(log.add("probe").is_empty(), !expect_active);
    }
}
