use bindery_domain::config::LoggingConfig;
use bindery_logger::Logger;

#[test]
fn second_subscriber_is_refused() {
    let _first = Logger::from_config("bindery-first", &LoggingConfig::default()).expect("first init");

    let err = Logger::from_config("bindery-second", &LoggingConfig::default()).expect_err("already installed");
    assert_eq!(err.code(), "subscriber");
}
