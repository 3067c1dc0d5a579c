use std::{cell::RefCell, rc::Rc};

use multierror::{close_all, close_all_into, BoxError, Close, ErrorCollector, MultiError, SharedError};

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("resource {0} failed to close")]
struct CloseFailed(usize);

/// Records every close into a shared log, failing if told to.
struct Resource {
    id: usize,
    fail: bool,
    log: Rc<RefCell<Vec<usize>>>,
}

impl Close for Resource {
    fn close(&mut self) -> Result<(), BoxError> {
        self.log.borrow_mut().push(self.id);
        if self.fail {
            Err(CloseFailed(self.id).into())
        } else {
            Ok(())
        }
    }
}

fn make_resources(failing: &[usize], count: usize) -> (Vec<Resource>, Rc<RefCell<Vec<usize>>>) {
    let log = Rc::new(RefCell::new(vec![]));
    let resources = (0..count)
        .map(|id| Resource {
            id,
            fail: failing.contains(&id),
            log: log.clone(),
        })
        .collect();
    (resources, log)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}

#[test]
fn test_close_all_succeeds() {
    init_tracing();

    let (resources, log) = make_resources(&[], 3);
    assert!(close_all(resources).is_ok());
    assert_eq!(*log.borrow(), vec![0, 1, 2]);
}

#[test]
fn test_close_all_empty() {
    assert!(close_all(Vec::<Resource>::new()).is_ok());
}

#[test]
fn test_close_all_continues_after_failure() {
    init_tracing();

    let (resources, log) = make_resources(&[1], 3);
    let err = close_all(resources).unwrap_err();

    assert_eq!(*log.borrow(), vec![0, 1, 2]);
    assert_eq!(err.to_string(), "resource 1 failed to close");
    assert_eq!(err.find::<CloseFailed>(), Some(&CloseFailed(1)));
    assert!(err.is(&CloseFailed(1)));
    assert!(!err.is(&CloseFailed(0)));
}

#[test]
fn test_close_all_every_failure_kept() {
    let (resources, log) = make_resources(&[0, 2], 3);
    let err = close_all(resources).unwrap_err();

    assert_eq!(*log.borrow(), vec![0, 1, 2]);
    assert_eq!(
        err.to_string(),
        "2 errors: resource 0 failed to close; resource 2 failed to close",
    );
}

#[test]
fn test_close_all_dyn_resources() {
    let (mut resources, log) = make_resources(&[1], 2);
    let (second, first) = (resources.pop().unwrap(), resources.pop().unwrap());

    let closers: Vec<Box<dyn Close>> = vec![Box::new(first), Box::new(second)];
    let err = close_all(closers).unwrap_err();
    assert_eq!(err.to_string(), "resource 1 failed to close");
    assert_eq!(*log.borrow(), vec![0, 1]);
}

#[test]
fn test_close_all_borrowed_resources() {
    let (mut resources, log) = make_resources(&[], 2);
    assert!(close_all(resources.iter_mut()).is_ok());
    assert!(close_all(&mut resources).is_ok());
    assert_eq!(*log.borrow(), vec![0, 1, 0, 1]);
}

#[test]
fn test_close_all_into_existing_collector() {
    let (resources, log) = make_resources(&[0, 1], 2);

    let mut errors = MultiError::new();
    errors.push_error("earlier failure");
    close_all_into(resources, &mut errors);

    assert_eq!(*log.borrow(), vec![0, 1]);
    assert_eq!(
        errors.finalize().unwrap_err().to_string(),
        "3 errors: earlier failure; resource 0 failed to close; resource 1 failed to close",
    );

    let (resources, _) = make_resources(&[1], 2);
    let mut raw: Vec<SharedError> = vec![];
    close_all_into(resources, &mut raw);
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].to_string(), "resource 1 failed to close");
}

#[test]
fn test_vec_collector_accumulates_like_multi_error() {
    let (resources, _) = make_resources(&[0], 2);
    let mut raw: Vec<SharedError> = vec![];
    close_all_into(resources, &mut raw);

    raw.add(None::<BoxError>);
    raw.add(Some("late failure"));
    assert_eq!(raw.add_result(Ok::<_, BoxError>(3)), Some(3));
    assert_eq!(raw.add_result(Err::<(), _>(CloseFailed(9))), None);

    let (resources, _) = make_resources(&[0, 1], 2);
    raw.push_error(close_all(resources).unwrap_err().into());

    let messages: Vec<_> = raw.iter().map(|e| e.to_string()).collect();
    assert_eq!(
        messages,
        [
            "resource 0 failed to close",
            "late failure",
            "resource 9 failed to close",
            "resource 0 failed to close",
            "resource 1 failed to close",
        ],
    );
    assert!(raw[2].is::<CloseFailed>());
}

#[cfg(feature = "tracing")]
mod events {
    use std::{
        fmt,
        sync::{Arc, Mutex},
    };

    use tracing::{
        field::{Field, Visit},
        Event, Level, Subscriber,
    };
    use tracing_subscriber::{
        layer::{Context, SubscriberExt},
        Layer,
    };

    use super::make_resources;

    /// A captured event: its level, message and other fields, in order.
    #[derive(Debug, PartialEq)]
    struct Captured {
        level: Level,
        message: String,
        fields: Vec<(String, String)>,
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<Captured>>>);

    impl Capture {
        fn take(&self) -> Vec<Captured> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    struct Fields {
        message: String,
        fields: Vec<(String, String)>,
    }

    impl Visit for Fields {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.message = format!("{value:?}");
            } else {
                self.fields.push((field.name().to_owned(), format!("{value:?}")));
            }
        }
    }

    impl<S: Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields {
                message: String::new(),
                fields: vec![],
            };
            event.record(&mut fields);
            self.0.lock().unwrap().push(Captured {
                level: *event.metadata().level(),
                message: fields.message,
                fields: fields.fields,
            });
        }
    }

    fn captured(level: Level, message: &str, fields: &[(&str, &str)]) -> Captured {
        Captured {
            level,
            message: message.to_owned(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_close_all_logs_failures_and_summary() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        let (resources, _) = make_resources(&[0, 2], 3);
        let result = tracing::subscriber::with_default(subscriber, || super::close_all(resources));
        assert!(result.is_err());

        assert_eq!(
            capture.take(),
            vec![
                captured(
                    Level::DEBUG,
                    "failed to close resource",
                    &[("index", "0"), ("error", "resource 0 failed to close")],
                ),
                captured(
                    Level::DEBUG,
                    "failed to close resource",
                    &[("index", "2"), ("error", "resource 2 failed to close")],
                ),
                captured(Level::TRACE, "closed resources", &[("failed", "2")]),
            ],
        );
    }

    #[test]
    fn test_close_all_success_logs_summary_only() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        let (resources, _) = make_resources(&[], 2);
        let result = tracing::subscriber::with_default(subscriber, || super::close_all(resources));
        assert!(result.is_ok());

        assert_eq!(
            capture.take(),
            vec![captured(Level::TRACE, "closed resources", &[("failed", "0")])],
        );
    }
}
