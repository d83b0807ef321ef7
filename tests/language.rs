use std::fs;

use jsinterp::{ExtractorError, FaultKind, InterpreterOptions, JsInterpreter, Value, call_function};
use pretty_assertions::assert_eq;
use serde_json::json;
use walkdir::WalkDir;

#[test]
fn snippet_fixtures_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/snippets").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "js"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let header = |key: &str| {
            source.lines()
                  .find_map(|line| line.strip_prefix(&format!("// {key}: ")))
                  .unwrap_or_else(|| panic!("{path:?} has no '{key}' header"))
                  .to_string()
        };

        let function = header("function");
        let args: Vec<serde_json::Value> = serde_json::from_str(&header("args")).unwrap();
        let expected: serde_json::Value = serde_json::from_str(&header("expect")).unwrap();

        let interp = JsInterpreter::new(&source).unwrap_or_else(|e| panic!("{path:?}: {e}"));
        let result = interp.extract_function(&function)
                           .and_then(|f| f.call_json(&args))
                           .unwrap_or_else(|e| panic!("{path:?} failed: {e}"));
        assert_eq!(result, expected, "{path:?}");
        count += 1;
    }

    assert!(count > 0, "No snippets found in tests/snippets");
}

fn run(source: &str, name: &str, args: &[serde_json::Value]) -> Result<serde_json::Value, ExtractorError> {
    JsInterpreter::new(source)?.extract_function(name)?.call_json(args)
}

fn assert_call(source: &str, name: &str, args: &[serde_json::Value], expected: serde_json::Value) {
    match run(source, name, args) {
        Ok(result) => assert_eq!(result, expected, "calling {name} in:\n{source}"),
        Err(e) => panic!("Script failed: {e}\n{source}"),
    }
}

fn assert_fault(source: &str, name: &str, kind: FaultKind) -> ExtractorError {
    match run(source, name, &[]) {
        Ok(result) => panic!("Script returned {result} but was expected to fail:\n{source}"),
        Err(e) => {
            assert_eq!(e.kind(), kind, "{e}");
            e
        },
    }
}

#[test]
fn empty_bodies_return_undefined() {
    assert_call("function x(){;}", "x", &[], json!(null));
    assert_call("function x(){}", "x", &[], json!(null));
    assert_call("function f(){return; y()}", "f", &[], json!(null));
}

#[test]
fn basic_functions() {
    assert_call("function x3(){return 42;}", "x3", &[], json!(42));
    assert_call("var x5 = function(){return 42;}", "x5", &[], json!(42));
    assert_call("function x4(a){return 2*a+1;}", "x4", &[json!(3)], json!(7));
}

#[test]
fn whitespace_and_identifier_characters() {
    assert_call("function x (a) { return 2 * a + 1 ; }", "x", &[json!(3)], json!(7));
    assert_call("function f () { x =  2  ; return x; }", "f", &[], json!(2));
    assert_call("function $_xY1 ($_axY1) { var $_axY2 = $_axY1 + 1; return $_axY2; }",
                "$_xY1",
                &[json!(20)],
                json!(21));
}

#[test]
fn operators() {
    assert_call("function f(){return 1 << 5;}", "f", &[], json!(32));
    assert_call("function f(){return 19 & 21;}", "f", &[], json!(17));
    assert_call("function f(){return 11 >> 2;}", "f", &[], json!(2));
    assert_call("function f(){return [7 % -3, -1 >>> 28, ~~3.7, 5 ^ 1 | 8];}",
                "f",
                &[],
                json!([1, 15, 3, 12]));
}

#[test]
fn array_mutation_is_visible_through_the_array() {
    assert_call("function f(){var x = [1,2,3]; x[0] = 4; x[0] = 5; x[2] = 7; return x;}",
                "f",
                &[],
                json!([5, 2, 7]));
}

#[test]
fn arrays_are_shared_and_scalars_are_copied() {
    assert_call("function f(){var a = [1], b = a, n = 1, m = n; b.push(2); m += 1; return [a, n, m, a === b];}",
                "f",
                &[],
                json!([[1, 2], 1, 2, true]));
    assert_call("function grow(a){a.push(9)} function f(){var x = []; grow(x); grow(x); return x;}",
                "f",
                &[],
                json!([9, 9]));
}

#[test]
fn parentheses_nest_arbitrarily() {
    assert_call("function f(){return (1) + (2) * ((( (( (((((3)))))) )) ));}", "f", &[], json!(7));
    assert_call("function f(){return (1 + 2) * 3;}", "f", &[], json!(9));
}

#[test]
fn compound_assignment() {
    assert_call("function f(){var x = 20; x = 30 + 1; return x;}", "f", &[], json!(31));
    assert_call("function f(){var x = 20; x += 30 + 1; return x;}", "f", &[], json!(51));
    assert_call("function f(){var x = 20; x -= 30 + 1; return x;}", "f", &[], json!(-11));
    assert_call("function f(){var a = [1, 2]; var i = 0; a[i++] += 10; return [a, i];}",
                "f",
                &[],
                json!([[11, 2], 1]));
}

#[test]
fn index_expressions_are_evaluated() {
    assert_call("function f(){var a = [10, 20, 30, 40, 50]; var b = 6; a[0] = a[b % a.length]; return a;}",
                "f",
                &[],
                json!([20, 20, 30, 40, 50]));
    assert_call("function f(){var a = [1, 2]; return [a[1.5], a[-1], a[7], a['1']];}",
                "f",
                &[],
                json!([null, null, null, 2]));
}

#[test]
fn functions_call_each_other() {
    let source = "function x() { return 2; }\n\
                  function y(a) { return x() + a; }\n\
                  function z() { return y(3); }";
    assert_call(source, "z", &[], json!(5));
}

#[test]
fn for_loops_with_break_and_continue() {
    assert_call("function x() { a=0; for (i=0; i-10; i++) {a++} return a }", "x", &[], json!(10));
    assert_call("function x() { a=0; for (i=0; i-10; i++) { continue; a++ } return a }",
                "x",
                &[],
                json!(0));
    assert_call("function x() { a=0; for (i=0; i-10; i++) { break; a++ } return a }",
                "x",
                &[],
                json!(0));
}

#[test]
fn if_else_chains_run_one_branch() {
    let source = "function f(n) { var r = [];\n\
                  if (n > 0) r.push('pos');\n\
                  if (n % 2) { r.push('odd') } else { r.push('even') }\n\
                  if (n < 0) r.push('neg'); else if (n == 0) r.push('zero');\n\
                  else if (n < 10) r.push('small'); else r.push('big');\n\
                  return r }";
    assert_call(source, "f", &[json!(3)], json!(["pos", "odd", "small"]));
    assert_call(source, "f", &[json!(0)], json!(["even", "zero"]));
    assert_call(source, "f", &[json!(-4)], json!(["even", "neg"]));
    assert_call(source, "f", &[json!(12)], json!(["pos", "even", "big"]));
}

#[test]
fn switch_falls_through() {
    let source = "function x(f) { switch(f){\n\
                      case 1:f+=1;\n\
                      case 2:f+=2;\n\
                      case 3:f+=3;break;\n\
                      case 4:f+=4;\n\
                      default:f=0;\n\
                  } return f }";
    assert_call(source, "x", &[json!(1)], json!(7));
    assert_call(source, "x", &[json!(3)], json!(6));
    assert_call(source, "x", &[json!(5)], json!(0));
}

#[test]
fn switch_default_anywhere() {
    let source = "function x(f) { switch(f){\n\
                      case 2: f+=2;\n\
                      default: f-=1;\n\
                      case 5:\n\
                      case 6: f+=6;\n\
                      case 0: break;\n\
                      case 1: f+=1;\n\
                  } return f }";
    assert_call(source, "x", &[json!(1)], json!(2));
    assert_call(source, "x", &[json!(5)], json!(11));
    assert_call(source, "x", &[json!(9)], json!(14));
}

#[test]
fn switch_matches_strictly() {
    let source = "function x(f) { switch(f){ case 1: return 'number'; case '1': return 'string'; } }";
    assert_call(source, "x", &[json!(1)], json!("number"));
    assert_call(source, "x", &[json!("1")], json!("string"));
    assert_call(source, "x", &[json!(true)], json!(null));
}

#[test]
fn try_catch_finally() {
    assert_call("function x() { try{return 10} catch(e){return 5} }", "x", &[], json!(10));
    assert_call("function x() { try{throw 3} catch(e){return e + 1} }", "x", &[], json!(4));
    assert_call("function x() { try{return 1} finally {return 2} }", "x", &[], json!(2));
    assert_call("function x() { var a = []; try { try { throw 'in' } finally { a.push('f') } } catch { a.push('c') } return a }",
                "x",
                &[],
                json!(["f", "c"]));
    assert_call("function x() { try { missing() } catch (e) { return [e.name, e.message] } }",
                "x",
                &[],
                json!(["ReferenceError", "missing is not defined"]));
}

#[test]
fn literals() {
    assert_call("function x() { return [1, 2, \"asdf\", [5, 6, 7]][3] }", "x", &[], json!([5, 6, 7]));
    assert_call("function x() { return {a: 1, 'b c': [2], 3: 'three'} }",
                "x",
                &[],
                json!({"a": 1, "b c": [2], "3": "three"}));
    assert_call("function x() { return ['\\x41\\u0042\\n', .5, 1e3, 0x10] }",
                "x",
                &[],
                json!(["AB\n", 0.5, 1000, 16]));
}

#[test]
fn comma_operator() {
    assert_call("function x() { a=5; a -= 1, a+=3; return a }", "x", &[], json!(7));
    assert_call("function x() { return (1, 2, 3) }", "x", &[], json!(3));
}

#[test]
fn typeof_and_void() {
    assert_call("function x(a) { return [typeof a, typeof undeclared, typeof x, typeof null, void 1] }",
                "x",
                &[json!("s")],
                json!(["string", "undefined", "function", "object", null]));
}

#[test]
fn top_level_helpers_resolve_lazily() {
    let source = "var Xy = {ab: function(a, b){ a.splice(0, b) }, cd: function(a){ a.reverse() }};\n\
                  var lookup = ['a', 'b', 'c'];\n\
                  function sig(s) { var a = s.split(''); Xy.cd(a); Xy.ab(a, 1); return a.join('') + lookup[2]; }";
    assert_call(source, "sig", &[json!("wxyz")], json!("yxwc"));
}

#[test]
fn top_level_definitions_need_no_semicolons() {
    assert_call("var a = function(){ return 1 }\nfunction b(){ return a() + 1 }", "b", &[], json!(2));
    assert_call("x = 1\ny = 2\nfunction f(){ return x + y }", "f", &[], json!(3));

    let interp = JsInterpreter::new("var h = {g: function(){ return 'g' }}\n\
                                     var k = function(){ return h.g() }\n\
                                     function m(){ return k() + 'm' }")
                 .unwrap();
    assert_eq!(interp.function_names(), ["k", "m"]);
    assert_eq!(interp.call_function("m", &[]).unwrap(), Value::from("gm"));
}

#[test]
fn array_writes_stay_bounded() {
    assert_call("function f(){ var a = [1]; a[a] = 2; a[[0]] = 5; return a }", "f", &[], json!([5, 2]));
    assert_call("function f(){ var a = [1]; a.push(a); return a.join('-') + '|' + a }",
                "f",
                &[],
                json!("1-|1,"));
    assert_call("function f(){ var a = []; try { a[4294967294] = 1 } catch (e) { return [e.name, a.length] } }",
                "f",
                &[],
                json!(["TypeError", 0]));
}

#[test]
fn globals_persist_between_calls() {
    let interp = JsInterpreter::new("function inc() { counter = (counter || 0) + 1; return counter }\n\
                                     var counter;")
                 .unwrap();
    assert_eq!(interp.call_function("inc", &[]).unwrap(), Value::from(1));
    assert_eq!(interp.call_function("inc", &[]).unwrap(), Value::from(2));
}

#[test]
fn extracted_functions_can_be_called_repeatedly() {
    let interp = JsInterpreter::new("function double(a) { return a * 2 }").unwrap();
    let double = interp.extract_function("double").unwrap();
    assert_eq!(double.name(), "double");
    assert_eq!(double.call(&[Value::from(4)]).unwrap(), Value::from(8));
    assert_eq!(double.call_json(&[json!(2.25)]).unwrap(), json!(4.5));
}

#[test]
fn function_names_in_source_order() {
    let interp = JsInterpreter::new("function b(){} var a = function(){}; c = function(){}; var d = 1;").unwrap();
    assert_eq!(interp.function_names(), ["b", "a", "c"]);
}

#[test]
fn closures_keep_their_scope() {
    let source = "function make() { var n = 0; return function() { return ++n } }\n\
                  function run() { var a = make(), b = make(); a(); a(); return [a(), b()] }";
    assert_call(source, "run", &[], json!([3, 1]));
}

#[test]
fn hoisting_within_functions() {
    assert_call("function f() { x = 3; return [x, g()]; var x; function g() { return 'g' } }",
                "f",
                &[],
                json!([3, "g"]));
    assert_call("function f() { var local = 1; return local } function g() { f(); return typeof local }",
                "g",
                &[],
                json!("undefined"));
}

#[test]
fn methods_by_computed_name() {
    assert_call("function f(a) { a[\"splice\"](0, 1); a['reverse'](); return a }",
                "f",
                &[json!([1, 2, 3])],
                json!([3, 2]));
}

#[test]
fn unknown_names_are_reference_faults() {
    let e = assert_fault("function f() { return nope + 1 }", "f", FaultKind::Reference);
    assert!(matches!(e, ExtractorError::Reference { ref name, pos: 22 } if name == "nope"), "{e:?}");
    assert_fault("function f() {}", "g", FaultKind::Reference);
    assert_fault("function f() { return g() }", "f", FaultKind::Reference);
}

#[test]
fn invalid_operations_are_type_faults() {
    assert_fault("function f() { var a = 1; return a() }", "f", FaultKind::Type);
    assert_fault("function f() { return null.length }", "f", FaultKind::Type);
    assert_fault("function f() { var a = []; a.x = 1 }", "f", FaultKind::Type);
    assert_fault("var f = 3;", "f", FaultKind::Type);
}

#[test]
fn uncaught_throws_reach_the_host() {
    let e = assert_fault("function f() { throw 'boom' }", "f", FaultKind::Uncaught);
    assert_eq!(e.to_string(), "Uncaught exception at offset 15: boom");
}

#[test]
fn syntax_faults() {
    assert!(matches!(JsInterpreter::new("function f() { return 1 # 2 }"),
                     Err(ExtractorError::Syntax(_))));
    assert!(matches!(JsInterpreter::new("function f() { return 1"), Err(ExtractorError::Syntax(_))));
    assert_fault("function f() { return 1 + }", "f", FaultKind::Syntax);
    assert_fault("function f() { 1 = 2 }", "f", FaultKind::Syntax);
}

#[test]
fn recursion_is_bounded() {
    let options = InterpreterOptions { max_call_depth: 20 };
    let interp = JsInterpreter::with_options("function f(n) { return f(n + 1) }", options).unwrap();
    let e = interp.call_function("f", &[Value::from(0)]).unwrap_err();
    assert!(matches!(e, ExtractorError::TooMuchRecursion { depth: 20, .. }), "{e:?}");
    assert_eq!(e.kind(), FaultKind::Uncaught);

    let interp = JsInterpreter::with_options("function f(n) { try { return f(n + 1) } catch (e) { return 'caught' } }",
                                             options)
                 .unwrap();
    assert!(interp.call_function("f", &[Value::from(0)]).is_err());

    let interp = JsInterpreter::with_options("function f(n) { return n ? f(n - 1) + 1 : 0 }", options).unwrap();
    assert_eq!(interp.call_function("f", &[Value::from(19)]).unwrap(), Value::from(19));
}

#[test]
fn free_function_entry_point() {
    assert_eq!(call_function("function f(a, b) { return a + b }", "f", &[Value::from("a"), Value::from(1)])
               .unwrap(),
               Value::from("a1"));
}
