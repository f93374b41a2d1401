// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::canary::Canary;
use crate::error::StackErrors;
use crate::report::{Dump, Report};

fn render(errors: StackErrors, live: &[&str], capacity: usize) -> String {
    let dump = Dump {
        stack: core::ptr::null(),
        canary_before: Canary::new(),
        buffer: live.as_ptr(),
        capacity,
        live,
        checksum: 7u64,
        computed: 9u64,
        canary_after: Canary::new(),
    };

    Report {
        errors,
        dump: Some(dump),
    }
    .to_string()
}

// =============================================================================
// Errors block
// =============================================================================

#[test]
fn test_errors_block_without_dump() {
    let report = Report::<u8, u64> {
        errors: StackErrors::POP_FROM_EMPTY_STACK | StackErrors::CANARY_AFTER_CORRUPTED,
        dump: None,
    }
    .to_string();

    assert_eq!(
        report,
        "Errors found:\n\
         \tPop from empty stack was performed;\n\
         \tCanary after the stack is corrupted;\n"
    );
}

#[test]
fn test_errors_block_lists_every_kind_in_order() {
    let report = Report::<u8, u64> {
        errors: StackErrors::all(),
        dump: None,
    }
    .to_string();

    assert_eq!(
        report,
        "Errors found:\n\
         \tPop from empty stack was performed;\n\
         \tFailed to allocate memory;\n\
         \tCheck of control sum failed;\n\
         \tCanary before the stack is corrupted;\n\
         \tCanary after the stack is corrupted;\n\
         \tTop from empty stack was performed;\n"
    );
}

// =============================================================================
// Dump
// =============================================================================

#[test]
fn test_dump_lists_live_slots_and_unused_range() {
    let report = render(StackErrors::WRONG_CONTROL_SUM, &["a", "b"], 4);

    assert!(report.starts_with("Errors found:\n\tCheck of control sum failed;\nDump:\n"));
    assert!(report.contains("\tcanary_before = 0xdeadbeef\n"));
    assert!(report.contains("\tbuffer[4] = 0x"));
    assert!(report.contains("\t\t[0] = \"a\"\n"));
    assert!(report.contains("\t\t[1] = \"b\"\n"));
    assert!(report.contains("\t\t[2..4] = <unused>\n"));
    assert!(report.contains("\tsize = 2\n"));
    assert!(report.contains("\tchecksum = 7 (computed 9)\n"));
    assert!(report.ends_with("\tcanary_after = 0xdeadbeef\n}\n"));
}

#[test]
fn test_dump_single_unused_slot() {
    let report = render(StackErrors::BAD_ALLOC, &["a"], 2);

    assert!(report.contains("\t\t[1] = <unused>\n"));
}

#[test]
fn test_dump_full_buffer_has_no_unused_line() {
    let report = render(StackErrors::BAD_ALLOC, &["a", "b"], 2);

    assert!(!report.contains("<unused>"));
}

#[cfg(all(feature = "safe", feature = "dump"))]
mod from_stack {
    use crate::error::StackErrors;
    use crate::stack::GuardedStack;

    #[test]
    fn test_report_dumps_stack_state() {
        let mut stack = GuardedStack::with_capacity(4);
        stack.push("a");
        stack.corrupt_canary_after(0);

        let err = stack.try_empty().expect_err("Expected try_empty() to fail");
        let report = err.report();

        assert_eq!(err.errors(), StackErrors::CANARY_AFTER_CORRUPTED);
        assert!(report.starts_with(
            "Errors found:\n\tCanary after the stack is corrupted;\nDump:\nstack = 0x"
        ));
        assert!(report.contains("\t\t[0] = \"a\"\n"));
        assert!(report.contains("\t\t[1..4] = <unused>\n"));
        assert!(report.contains("\tsize = 1\n"));
        assert!(report.contains("\tcanary_before = 0xdeadbeef\n"));
        assert!(report.contains("\tcanary_after = 0x0\n"));
    }

    #[test]
    fn test_report_shows_checksum_mismatch() {
        let mut stack: GuardedStack<u32, _, _> = GuardedStack::with_parts(
            crate::config::StackConfig::default().with_initial_capacity(2),
            |v: &u32| *v,
            crate::system::SystemAllocator,
        );
        stack.push(5);
        stack.corrupt_checksum(3);

        let err = stack.try_top().expect_err("Expected try_top() to fail");

        assert!(err.report().contains("\tchecksum = 3 (computed 5)\n"));
    }
}

#[cfg(not(feature = "dump"))]
mod without_dump {
    use crate::error::StackErrors;
    use crate::stack::GuardedStack;

    #[test]
    fn test_report_has_no_dump_section() {
        let mut stack: GuardedStack<u32> = GuardedStack::with_capacity(2);
        stack.push(1);
        stack.corrupt_checksum(0);

        let err = stack.verify().expect_err("Expected verify() to fail");

        assert_eq!(err.errors(), StackErrors::WRONG_CONTROL_SUM);
        assert_eq!(err.report(), "Errors found:\n\tCheck of control sum failed;\n");
        assert!(!err.report().contains("Dump:"));
    }
}
