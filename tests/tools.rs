#![allow(dead_code)]
use anyhow::{bail, ensure};
use futures_executor::block_on;
use proptest::prelude::*;
use routcome::{failure, success, Capture, Fault, Outcome};
use std::{cell::Cell, fmt::Debug, future::Future};

/// Outcomes with both variants, fault values are short lowercase words.
pub fn arb_outcome() -> impl Strategy<Value = Outcome<i32, String>> {
    prop_oneof![
        any::<i32>().prop_map(success::<i32, String>),
        "[a-z]{0,8}".prop_map(failure::<i32, String>),
    ]
}

pub fn double(x: i32) -> i32 {
    x.wrapping_mul(2)
}

pub fn shift(x: i32) -> i32 {
    x.wrapping_sub(7)
}

/// Halves even numbers, fails on odd ones.
pub fn half(x: i32) -> Outcome<i32, String> {
    if x % 2 == 0 {
        success(x / 2)
    } else {
        failure(format!("{} is odd", x))
    }
}

pub fn non_negative(x: i32) -> Outcome<i32, String> {
    if x >= 0 {
        success(x)
    } else {
        failure("negative".to_string())
    }
}

/// Counts how many times a lazily evaluated producer was called.
#[derive(Default)]
pub struct Probe {
    calls: Cell<usize>,
}

impl Probe {
    pub fn call<T>(&self, value: T) -> T {
        self.calls.set(self.calls.get() + 1);
        value
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

/// Runs operation through a capture boundary and checks what came out.
pub struct CaptureCase<T> {
    name: Option<String>,
    capture: Capture,

    /// Expected outcome, compared with `==`.
    result: Option<Outcome<T, Fault>>,

    /// Fragment that has to be present in absorbed defect's message.
    defect: Option<String>,
}

impl<T> CaptureCase<T>
where
    T: Debug + PartialEq,
{
    pub fn new() -> Self {
        Self {
            name: None,
            capture: Capture::default(),
            result: None,
            defect: None,
        }
    }

    pub fn name<N: ToString>(mut self, name: N) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn capture(mut self, capture: Capture) -> Self {
        self.capture = capture;
        self
    }

    pub fn result(mut self, result: Outcome<T, Fault>) -> Self {
        self.result = Some(result);
        self
    }

    pub fn defect<D: ToString>(mut self, fragment: D) -> Self {
        self.defect = Some(fragment.to_string());
        self
    }

    pub fn run<E, Op>(self, op: Op) -> anyhow::Result<()>
    where
        Op: FnOnce() -> Result<T, E>,
        E: Into<Fault>,
    {
        let out = self.capture.run(op);
        self.check(out)
    }

    pub fn run_async<E, Fut, Op>(self, op: Op) -> anyhow::Result<()>
    where
        Op: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Fault>,
    {
        let out = block_on(self.capture.run_async(op));
        self.check(out)
    }

    fn check(self, out: Outcome<T, Fault>) -> anyhow::Result<()> {
        let name = self.name.unwrap_or_default();

        if let Some(result) = self.result {
            assert_eq!(out, result, "test case {}", name);
            return Ok(());
        }

        if let Some(fragment) = self.defect {
            return out.fold(
                |value| bail!("test case {}, expected defect, got {:?}", name, value),
                |fault| {
                    ensure!(fault.is_defect(), "test case {}, not a defect: {}", name, fault);
                    ensure!(
                        fault.message().contains(&fragment),
                        "test case {}, {:?} not found in {:?}",
                        name,
                        fragment,
                        fault.message()
                    );
                    Ok(())
                },
            );
        }

        bail!("test case {} has nothing to check", name)
    }
}
