#![no_main]

use esparse_core::{ParseOptions, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    for options in [
        ParseOptions::default().with_ranges(true),
        ParseOptions::module().with_next(true),
        ParseOptions::default().with_web_compat(false).with_locations(true),
    ] {
        match parse(source, &options) {
            Ok(program) => {
                // The program spans the whole input and ranges mirror offsets.
                assert_eq!(program.loc.start, 0);
                assert!(program.loc.end <= source.len());
                if let Some((start, end)) = program.loc.range {
                    assert_eq!((start, end), (program.loc.start, program.loc.end));
                }
                for item in &program.body {
                    let loc = match item {
                        esparse_core::ProgramItem::Stmt(stmt) => stmt.loc(),
                        esparse_core::ProgramItem::ModuleDecl(decl) => decl.loc(),
                    };
                    assert!(loc.start <= loc.end && loc.end <= program.loc.end);
                }
            }
            Err(err) => {
                // Errors always point inside (or at the end of) the input.
                assert!(err.offset() <= source.len());
            }
        }
    }

    // Mutation rarely builds deep nesting; wrap the input in it directly.
    let depth = 64 * (1 + source.len() % 64);
    for (open, close) in [("[", "]"), ("(", ")"), ("{", "}")] {
        let nested = format!("{}{source}{}", open.repeat(depth), close.repeat(depth));
        if let Err(err) = parse(&nested, &ParseOptions::default()) {
            assert!(err.offset() <= nested.len());
        }
    }
});
