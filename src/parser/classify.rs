//! Line classification for gdb backtrace output.
//!
//! Every line of a capture log falls into exactly one `LineKind`. The
//! grammar is a table of `(category, pattern)` rules tried top to bottom;
//! the first match wins and anything matching no rule is `Unrecognized`.
//! Supporting a new gdb output variant means adding a row to `RULES`.

use crate::utils::config::TRACE_SEPARATOR;
use once_cell::sync::Lazy;
use regex::Regex;

/// Meaning of one line of captured output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Round boundary marker echoed before each backtrace request
    Separator,
    /// Start of one thread's backtrace
    ThreadHeader { thread_id: &'a str },
    /// One frame of the current thread's backtrace
    Frame { name: &'a str },
    /// Informational gdb chatter, dropped silently
    Noise,
    /// Nothing in the grammar matched
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Separator,
    ThreadHeader,
    Frame,
    Noise,
}

struct Rule {
    category: Category,
    pattern: Regex,
}

impl Rule {
    fn new(category: Category, pattern: &str) -> Self {
        Self {
            category,
            pattern: Regex::new(pattern).expect("grammar rules are valid regexes"),
        }
    }
}

const ADDR: &str = r"0x[0-9a-fA-F]+";

/// Argument list: parentheses nested up to two levels deep
const ARGS: &str = r"\((?:[^()]|\((?:[^()]|\([^()]*\))*\))*\)";

/// Optional `at file:line` or `from library` suffix
const LOCATION: &str = r"(?:\s+(?:at|from)\s+\S+)?\s*$";

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use Category::*;

    vec![
        Rule::new(
            Separator,
            &format!(r"^\s*{}\s*$", regex::escape(TRACE_SEPARATOR)),
        ),
        // Thread 2 (Thread 0x7f3c2e5fe700 (LWP 4242)):
        Rule::new(
            ThreadHeader,
            &format!(r"^Thread \d+ \(Thread {ADDR} \(LWP (?P<tid>\d+)\)"),
        ),
        // Thread 1 (LWP 4242): / Thread 1 (process 4242):
        Rule::new(ThreadHeader, r"^Thread \d+ \((?:LWP|process) (?P<tid>\d+)\)"),
        // Frame names may contain " (" themselves (`std::tuple<void (*)()>`,
        // `call_once<fn(), ()>`), so the name is greedy and the argument
        // list is the last balanced group on the line.
        //
        // #1  0x000055d4 in run (ctx=0x1) at src/run.c:42
        // #2  0x00007f12 in start_thread () from /lib/libpthread.so.0
        // #3  0x00007f12 in clone ()
        Rule::new(
            Frame,
            &format!(r"^#\d+\s+{ADDR} in (?P<frame>.+) {ARGS}{LOCATION}"),
        ),
        // #0  __GI___poll (fds=..., nfds=1) at ../sysdeps/unix/sysv/linux/poll.c:29
        Rule::new(Frame, &format!(r"^#\d+\s+(?P<frame>.+) {ARGS}{LOCATION}")),
        // #1  <signal handler called>
        Rule::new(Frame, r"^#\d+\s+(?P<frame><[^>]+>)\s*$"),
        // #4  0x0000 in handler (arg=0x1,   <- arguments wrapped onto the next line
        Rule::new(
            Frame,
            &format!(r"^#\d+\s+(?:{ADDR} in )?(?P<frame>.+) \((?:[^()]|\([^()]*\))*$"),
        ),
        // Unbalanced parentheses inside argument values: cut at the first " ("
        Rule::new(
            Frame,
            &format!(r"^#\d+\s+(?:{ADDR} in )?(?P<frame>.+?) \("),
        ),
        Rule::new(Noise, r"^\s*$"),
        Rule::new(Noise, r"^\[New (?:LWP|Thread) .*\]\s*$"),
        Rule::new(Noise, r"^\[Thread debugging using libthread_db enabled\]"),
        Rule::new(Noise, r"^\[Inferior \d+ \(process \d+\) detached\]"),
        Rule::new(Noise, r"^Using host libthread_db library "),
        Rule::new(Noise, r"^(?:Reading|Loaded) symbols "),
        Rule::new(Noise, r"^Attaching to (?:process|program)"),
        Rule::new(Noise, r"^Downloading separate debug info "),
        Rule::new(Noise, r"^warning: "),
        Rule::new(Noise, r"^\(No debugging symbols found in .*\)\s*$"),
        Rule::new(Noise, r"^\d+\s+.*: No such file or directory\.\s*$"),
        // Source line echo printed after the attach-time frame summary
        Rule::new(Noise, r"^\d+\t"),
        // Attach-time summary of the current frame: frame shaped, but no #N
        Rule::new(Noise, &format!(r"^{ADDR} in .+ \(")),
        // Tail of a frame whose arguments wrapped
        Rule::new(Noise, r"^\s+.*\)\s+(?:at|from)\s+\S+\s*$"),
        Rule::new(Noise, r"^\s+(?:at|from)\s+\S+\s*$"),
    ]
});

/// Classify one line of captured gdb output
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim_end_matches(['\r', '\n']);

    for rule in RULES.iter() {
        let Some(caps) = rule.pattern.captures(line) else {
            continue;
        };

        return match rule.category {
            Category::Separator => LineKind::Separator,
            Category::ThreadHeader => match caps.name("tid") {
                Some(tid) => LineKind::ThreadHeader {
                    thread_id: tid.as_str(),
                },
                None => LineKind::Unrecognized,
            },
            Category::Frame => match caps.name("frame") {
                Some(frame) => LineKind::Frame {
                    name: frame.as_str().trim(),
                },
                None => LineKind::Unrecognized,
            },
            Category::Noise => LineKind::Noise,
        };
    }

    LineKind::Unrecognized
}
