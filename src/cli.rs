/// Status output. Everything here goes to stderr so stdout only carries the report.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {{
        eprint!("{} ", console::style("INFO   ").on_blue().bright());
        eprintln!($($arg)+);
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {{
        eprint!("{} ", console::style("WARN   ").on_yellow().bright());
        eprintln!($($arg)+);
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {{
        eprint!("{} ", console::style("ERROR  ").on_red().bright());
        eprintln!($($arg)+);
    }};
}

#[macro_export]
macro_rules! due_to {
    ($($arg:tt)+) => {{
        eprint!("{} ", console::style("DUE TO ").on_red().bright());
        eprintln!($($arg)+);
    }};
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {{
        if $crate::VERBOSE.load(std::sync::atomic::Ordering::Relaxed) {
            eprint!("{} ", console::style("DEBUG  ").dim());
            eprintln!($($arg)+);
        }
    }};
}
