use simplejs_runtime::{ErrorKind, Interpreter};

#[test]
fn unbounded_recursion_is_a_range_error() {
    let mut interp = Interpreter::default();
    let v = interp.eval("function f() { return f(); } f()").unwrap();
    assert!(v.is_error());
    assert_eq!(interp.error_kind(v).unwrap(), ErrorKind::RangeError);
    assert_eq!(
        interp.error_message(v).unwrap(),
        "Maximum call stack size exceeded"
    );
    assert_eq!(interp.call_depth(), 0);
}

#[test]
fn overflow_can_be_caught_in_script() {
    let mut interp = Interpreter::default();
    let v = interp
        .eval(
            "function down(n) { return down(n + 1); }
             var caught;
             try { down(0) } catch (e) { caught = e.name + ': ' + e.message }
             caught",
        )
        .unwrap();
    assert_eq!(
        interp.to_string(v).unwrap(),
        "RangeError: Maximum call stack size exceeded"
    );
}

#[test]
fn configured_depth_is_honoured() {
    let mut interp = Interpreter::default();
    interp.set_max_stack_size(10);
    interp
        .eval("function d(n) { return n == 0 ? 0 : 1 + d(n - 1); }")
        .unwrap();
    assert_eq!(interp.eval("d(5)").unwrap().as_number(), 5.0);
    let v = interp.eval("d(20)").unwrap();
    assert_eq!(interp.error_kind(v).unwrap(), ErrorKind::RangeError);
}

#[test]
fn interpreter_is_usable_after_overflow() {
    let mut interp = Interpreter::default();
    interp.eval("function f() { return f(); } f()").unwrap();
    assert_eq!(interp.eval("1 + 1").unwrap().as_number(), 2.0);
    interp.collect_garbage();
    let stats = interp.heap_stats();
    assert_eq!(stats.call_depth, 0);
    assert_eq!(stats.temp_roots, 0);
}

#[test]
fn mutual_recursion_counts_every_frame() {
    let mut interp = Interpreter::default();
    let v = interp
        .eval(
            "function even(n) { return n == 0 ? true : odd(n - 1); }
             function odd(n) { return n == 0 ? false : even(n - 1); }
             even(100)",
        )
        .unwrap();
    assert_eq!(v.as_boolean(), Some(true));
    let v = interp.eval("even(1000)").unwrap();
    assert_eq!(interp.error_kind(v).unwrap(), ErrorKind::RangeError);
}

#[test]
fn frame_outcomes_record_returns_throws_and_overflows() {
    let mut interp = Interpreter::default();
    interp
        .eval("function ok() { return 1 } function bad() { throw 'x' }")
        .unwrap();
    let before = interp.heap_stats().frames;
    assert_eq!(before.overflowed, 0);

    interp.eval("ok(); ok()").unwrap();
    let after_ok = interp.heap_stats().frames;
    assert_eq!(after_ok.returned, before.returned + 2);
    assert_eq!(after_ok.thrown, before.thrown);

    interp.eval("try { bad() } catch (e) {}").unwrap();
    assert_eq!(interp.heap_stats().frames.thrown, after_ok.thrown + 1);

    interp.set_max_stack_size(10);
    interp.eval("function f() { return f(); } f()").unwrap();
    let frames = interp.heap_stats().frames;
    assert_eq!(frames.overflowed, 1);
    // Every admitted frame unwinds with the RangeError.
    assert!(frames.thrown >= after_ok.thrown + 1 + 8);
    assert!(interp.dump_stats().contains("1 overflowed"));
}
