use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use log::info;
use log::warn;

/// Collects the durations of named phases of a computation, for example the
/// completion and the enumeration of normal forms.
#[derive(Default)]
pub struct Timing {
    results: Rc<RefCell<Vec<(String, f32)>>>,
}

/// Measures the time between its creation and the call to `finish()`.
///
/// Dropping a timer that was never finished logs a warning, since the
/// measurement would otherwise silently be lost.
pub struct Timer {
    name: String,
    start: Instant,
    results: Rc<RefCell<Vec<(String, f32)>>>,
    registered: bool,
}

impl Timing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new timer with the given name.
    pub fn start(&self, name: &str) -> Timer {
        Timer {
            name: name.to_string(),
            start: Instant::now(),
            results: self.results.clone(),
            registered: false,
        }
    }

    /// Returns the total time registered under the given name.
    pub fn total(&self, name: &str) -> f32 {
        self.results
            .borrow()
            .iter()
            .filter(|(other, _)| other == name)
            .map(|(_, time)| time)
            .sum()
    }

    /// Prints the finished timers in the order they were finished, phases
    /// that ran more than once are summed.
    pub fn print(&self) {
        let mut names: Vec<String> = Vec::new();
        for (name, _) in self.results.borrow().iter() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }

        for name in names {
            eprintln!("Time {}: {:.3}s", name, self.total(&name));
        }
    }
}

impl Timer {
    /// Finishes the timer and registers the result.
    pub fn finish(&mut self) {
        let time = self.start.elapsed().as_secs_f64();
        info!("Time {}: {:.3}s", self.name, time);

        self.results.borrow_mut().push((self.name.clone(), time as f32));
        self.registered = true
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.registered {
            warn!("Timer {} was dropped before 'finish()'", self.name);
        }
    }
}
