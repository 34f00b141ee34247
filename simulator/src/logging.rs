use std::sync::OnceLock;
use std::thread;
use std::time::Instant;

static SIM_START: OnceLock<Instant> = OnceLock::new();

/// One narration line: seconds since the simulator started plus the name of
/// the thread that produced the event.
pub fn emit(message: &str) {
    let elapsed = SIM_START.get_or_init(Instant::now).elapsed();
    let current = thread::current();
    let thread_name = current.name().unwrap_or("main");
    println!("[{:>9.3}][{thread_name}] {message}", elapsed.as_secs_f64());
}

#[macro_export]
macro_rules! sim_log {
    ($($arg:tt)*) => {
        $crate::logging::emit(&format!($($arg)*))
    };
}
