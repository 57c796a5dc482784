#![no_main]

use esparse_core::Scanner;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    // Tokens are ordered, non-overlapping and lie on char boundaries.
    if let Ok(tokens) = Scanner::tokenize_all(source) {
        let mut last_end = 0;
        for tok in &tokens {
            let (start, end) = (tok.span.start.offset, tok.span.end.offset);
            assert!(last_end <= start && start <= end && end <= source.len());
            assert!(source.is_char_boundary(start) && source.is_char_boundary(end));
            last_end = end;
        }
    }
});
