//! Integration tests for the kinds of callables an injector can hold:
//! plain functions, closures with captured state, constructors and instances.

use alias_injector::{Args, Callable, Injector, Result};
use std::sync::{Arc, Mutex};

fn multiply_by_two(args: Args) -> Result<i32> {
    Ok(args.at::<i32>(0)? * 2)
}

#[test]
fn test_register_function_item() -> Result<()> {
    let injector = Injector::new();
    injector.register(Callable::new(multiply_by_two), "double")?;

    let double = injector.get("double")?;
    assert_eq!(double.call_cloned::<i32>(Args::new().arg(21))?, 42);
    Ok(())
}

#[test]
fn test_register_closure_with_state() -> Result<()> {
    let injector = Injector::new();
    let multiplier = 3;
    injector.register(
        Callable::new(move |args: Args| Ok(args.at::<i32>(0)? * multiplier)),
        "triple",
    )?;

    let triple = injector.get("triple")?;
    assert_eq!(triple.call_cloned::<i32>(Args::new().arg(14))?, 42);
    Ok(())
}

#[test]
fn test_register_constructor() -> Result<()> {
    #[derive(Debug, Clone, PartialEq)]
    struct Connection {
        url: String,
        pool: usize,
    }

    let injector = Injector::new();
    injector.register(
        Callable::function("Connection", ["url", "pool"], |args: Args| {
            Ok(Connection {
                url: args.param::<String>(0, "url")?.clone(),
                pool: *args.param::<usize>(1, "pool")?,
            })
        }),
        "connection",
    )?;

    let connect = injector.get("connection")?;
    let first = connect.call_as::<Connection>(
        Args::new()
            .kwarg("url", "postgres://localhost".to_string())
            .kwarg("pool", 4usize),
    )?;
    let second = connect.call_as::<Connection>(
        Args::new()
            .arg("postgres://localhost".to_string())
            .arg(4usize),
    )?;

    // a constructor builds a new instance per call
    assert_eq!(*first, *second);
    assert!(!Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_register_callback_pattern() -> Result<()> {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();

    let injector = Injector::new();
    injector.register(
        Callable::new(move |args: Args| {
            messages_clone
                .lock()
                .unwrap()
                .push(args.at::<String>(0)?.clone());
            Ok(())
        }),
        "log",
    )?;

    let handler = injector.inject(["log"]).apply(Callable::function(
        "handler",
        ["log"],
        |args: Args| {
            let log = args.callable(0, "log")?;
            log.call(Args::new().arg("Test message".to_string()))?;
            Ok(())
        },
    ));
    handler.call(Args::new())?;

    let msgs = messages.lock().unwrap();
    assert_eq!(*msgs, vec!["Test message".to_string()]);
    Ok(())
}

#[test]
fn test_mismatched_argument_type() {
    let injector = Injector::new();
    injector
        .register(Callable::new(multiply_by_two), "double")
        .unwrap();

    let double = injector.get("double").unwrap();
    let err = double.call(Args::new().arg("21")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "argument `#0` is not of type i32"
    );
}
