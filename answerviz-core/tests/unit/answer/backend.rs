use super::*;
use std::time::Instant;

#[test]
fn static_backend_repeats_its_response() {
    let b = StaticBackend::new("hello");
    assert_eq!(b.complete("q1", Duration::from_secs(1)).unwrap(), "hello");
    assert_eq!(b.complete("q2", Duration::from_secs(1)).unwrap(), "hello");
}

#[test]
fn closures_are_backends() {
    let b = |q: &str, _: Duration| -> AnswerVizResult<String> { Ok(q.to_uppercase()) };
    assert_eq!(b.complete("why", Duration::from_secs(1)).unwrap(), "WHY");
}

#[test]
fn missing_program_is_an_upstream_error() {
    let b = CommandBackend::new("answerviz-no-such-program-anywhere");
    let err = b.complete("q", Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, AnswerVizError::Upstream(_)), "{err}");
}

#[cfg(unix)]
#[test]
fn command_backend_pipes_question_through() {
    let b = CommandBackend::new("sh").args(["-c", "cat"]);
    let out = b.complete("what is orbit?", Duration::from_secs(10)).unwrap();
    assert_eq!(out, "what is orbit?");
}

#[cfg(unix)]
#[test]
fn non_zero_exit_is_an_upstream_error() {
    let b = CommandBackend::new("sh").arg("-c").arg("exit 3");
    let err = b.complete("q", Duration::from_secs(10)).unwrap_err();
    assert!(matches!(err, AnswerVizError::Upstream(_)), "{err}");
}

#[cfg(unix)]
#[test]
fn slow_command_is_killed_at_timeout() {
    let b = CommandBackend::new("sh").args(["-c", "sleep 10"]);
    let started = Instant::now();
    let err = b.complete("q", Duration::from_millis(150)).unwrap_err();
    assert!(err.to_string().contains("did not answer"), "{err}");
    assert!(started.elapsed() < Duration::from_secs(5));
}
