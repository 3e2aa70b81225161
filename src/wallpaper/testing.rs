//! In-memory stand-ins for the network and the desktop tools

use bytes::Bytes;
use std::cell::RefCell;
use std::collections::HashMap;

use super::error::WallpaperError;
use super::feed::Fetcher;
use crate::common::process::{CommandOutput, CommandRunner, ProcessError};

/// Serves canned bodies by URL; unknown URLs fail with a network error.
#[derive(Default)]
pub struct FakeFetcher {
    bodies: HashMap<String, Bytes>,
    calls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies
            .insert(url.to_string(), Bytes::copy_from_slice(body));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Bytes, WallpaperError> {
        self.calls.borrow_mut().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| WallpaperError::network(url, "connection refused"))
    }
}

pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        success: true,
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn failed(stderr: &str) -> CommandOutput {
    CommandOutput {
        success: false,
        code: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

type Handler = Box<dyn Fn(&str, &[&str]) -> CommandOutput>;

/// Answers commands through a closure and records every invocation.
pub struct FakeRunner {
    handler: Handler,
    calls: RefCell<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new(handler: impl Fn(&str, &[&str]) -> CommandOutput + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A minimal Xfce session: the given mode, workspace value and xrandr output.
    pub fn xfce(single_mode: Option<bool>, workspaces: &str, xrandr: &str) -> Self {
        let workspaces = workspaces.to_string();
        let xrandr = xrandr.to_string();
        Self::new(move |program, args| {
            if program == "xrandr" {
                return ok(&xrandr);
            }
            if args.contains(&"-s") {
                return ok("");
            }
            let property = args
                .iter()
                .position(|a| *a == "-p")
                .and_then(|i| args.get(i + 1))
                .copied()
                .unwrap_or_default();
            match property {
                "/backdrop/single-workspace-mode" => match single_mode {
                    Some(mode) => ok(&format!("{}\n", mode)),
                    None => failed("Property \"/backdrop/single-workspace-mode\" does not exist"),
                },
                "/backdrop/single-workspace-number" | "/general/workspace_count" => {
                    ok(&format!("{}\n", workspaces))
                }
                _ => failed("unexpected property"),
            }
        })
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Recorded `xfconf-query ... -s <value>` invocations
    pub fn set_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|c| c.iter().any(|a| a == "-s"))
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ProcessError> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| a.to_string()));
        self.calls.borrow_mut().push(call);
        Ok((self.handler)(program, args))
    }
}
