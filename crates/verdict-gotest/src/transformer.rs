// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Conversion of aggregated results into the normalized report

use std::collections::BTreeMap;

use tracing::debug;

use crate::aggregator::{ResultAggregator, Results};
use crate::classifier::CompileError;
use crate::result::{
    COMPILATION_ERROR, Reason, TestCase, TestError, TestModule, TestReport, TestState,
};

/// Build the normalized report for a run
///
/// A build failure that produced no structured events at all is reported as
/// a module named after the failing unit with a single failed
/// `CompilationError` test. Messages from `compile_error` take precedence
/// over captured output for every `CompilationError` test.
#[must_use]
pub fn transform(aggregator: &ResultAggregator, compile_error: Option<&CompileError>) -> TestReport {
    let mut results = aggregator.results();

    if let Some(compile_error) = compile_error {
        if results.is_empty() {
            debug!(unit = %compile_error.unit, "no structured events, reporting compile error");
            results = synthetic_results(compile_error);
        }
    }

    let mut has_failures = false;
    let mut test_modules = Vec::with_capacity(results.len());

    for (module_id, tests) in results {
        let mut cases = Vec::with_capacity(tests.len());

        for (name, state) in tests {
            let errors = if state == TestState::Failed {
                has_failures = true;
                errors_for(aggregator, compile_error, &module_id, &name)
            } else {
                Vec::new()
            };

            cases.push(TestCase {
                full_name: format!("{module_id}/{name}"),
                name,
                state,
                errors,
            });
        }

        test_modules.push(TestModule {
            module_id,
            tests: cases,
        });
    }

    let reason = if has_failures {
        Reason::Failed
    } else {
        Reason::Passed
    };

    TestReport {
        test_modules,
        reason,
    }
}

fn synthetic_results(compile_error: &CompileError) -> Results {
    let tests = BTreeMap::from([(COMPILATION_ERROR.to_string(), TestState::Failed)]);
    BTreeMap::from([(compile_error.unit.clone(), tests)])
}

fn errors_for(
    aggregator: &ResultAggregator,
    compile_error: Option<&CompileError>,
    module: &str,
    test: &str,
) -> Vec<TestError> {
    if test == COMPILATION_ERROR {
        if let Some(compile_error) = compile_error {
            return compile_error.messages.iter().map(TestError::new).collect();
        }
    }

    let output = aggregator.test_output(module, test);
    if output.is_empty() {
        Vec::new()
    } else {
        vec![TestError::new(output)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify_str;
    use crate::event::{Action, TestEvent};
    use similar_asserts::assert_eq;

    const PKG: &str = "example.com/pkg";

    fn report_for(input: &str) -> TestReport {
        let stream = classify_str(input);
        let aggregator = ResultAggregator::from_events(stream.events());
        transform(&aggregator, stream.compile_error.as_ref())
    }

    fn single(state: Action) -> TestReport {
        let mut aggregator = ResultAggregator::new();
        aggregator.process_event(&TestEvent::new(state, PKG, "TestExample"));
        transform(&aggregator, None)
    }

    #[test]
    fn test_empty_results() {
        let report = transform(&ResultAggregator::new(), None);
        assert_eq!(report, TestReport::empty());
    }

    #[test]
    fn test_single_test_properties() {
        let report = single(Action::Pass);
        assert_eq!(report.test_modules.len(), 1);

        let module = &report.test_modules[0];
        assert_eq!(module.module_id, PKG);
        assert_eq!(module.tests.len(), 1);

        let test = &module.tests[0];
        assert_eq!(test.name, "TestExample");
        assert_eq!(test.full_name, "example.com/pkg/TestExample");
        assert_eq!(test.state, TestState::Passed);
        assert!(test.errors.is_empty());
        assert_eq!(report.reason, Reason::Passed);
    }

    #[test]
    fn test_maps_states() {
        assert_eq!(single(Action::Fail).test_modules[0].tests[0].state, TestState::Failed);
        assert_eq!(single(Action::Skip).test_modules[0].tests[0].state, TestState::Skipped);
        assert_eq!(single(Action::Skip).reason, Reason::Passed);
    }

    #[test]
    fn test_reason() {
        let cases = [
            (&["pass", "pass"], Reason::Passed),
            (&["pass", "fail"], Reason::Failed),
            (&["fail", "fail"], Reason::Failed),
        ];

        for (actions, expected) in cases {
            let mut aggregator = ResultAggregator::new();
            for (i, action) in actions.iter().enumerate() {
                aggregator.process_event(&TestEvent::new(*action, PKG, &format!("Test{i}")));
            }
            assert_eq!(transform(&aggregator, None).reason, expected, "{actions:?}");
        }
    }

    #[test]
    fn test_failed_test_carries_output() {
        let report = report_for(
            r#"{"Action":"output","Package":"example.com/pkg","Test":"TestFail","Output":"Expected 6 but got 5\n"}
{"Action":"fail","Package":"example.com/pkg","Test":"TestFail"}"#,
        );
        let test = &report.test_modules[0].tests[0];
        assert_eq!(test.errors, vec![TestError::new("Expected 6 but got 5")]);
    }

    #[test]
    fn test_passed_test_never_carries_output() {
        let report = report_for(
            r#"{"Action":"output","Package":"p","Test":"TestOk","Output":"log line\n"}
{"Action":"pass","Package":"p","Test":"TestOk"}"#,
        );
        assert!(report.test_modules[0].tests[0].errors.is_empty());
    }

    #[test]
    fn test_failed_test_without_output_has_no_errors() {
        let report = single(Action::Fail);
        assert!(report.test_modules[0].tests[0].errors.is_empty());
    }

    #[test]
    fn test_compile_error_messages_become_separate_errors() {
        let report = report_for(
            "# example.com/pkg\nexample.go:9:8: undefined: NewFormatter\nexample.go:10:12: undefined: TestEvent\n{\"Action\":\"fail\",\"Package\":\"example.com/pkg\",\"Elapsed\":0}",
        );

        assert_eq!(report.reason, Reason::Failed);
        let test = &report.test_modules[0].tests[0];
        assert_eq!(test.name, COMPILATION_ERROR);
        assert_eq!(
            test.errors,
            vec![
                TestError::new("example.go:9:8: undefined: NewFormatter"),
                TestError::new("example.go:10:12: undefined: TestEvent"),
            ]
        );
    }

    #[test]
    fn test_header_only_build_failure_is_reported() {
        let report = report_for("# command-line-arguments");
        assert_eq!(report.reason, Reason::Failed);
        assert_eq!(report.test_modules.len(), 1);

        let module = &report.test_modules[0];
        assert_eq!(module.module_id, "command-line-arguments");
        assert_eq!(module.tests[0].full_name, "command-line-arguments/CompilationError");
        assert!(module.tests[0].errors.is_empty());
    }

    #[test]
    fn test_compile_error_not_synthesized_when_modules_exist() {
        let report = report_for(
            "# other\nother.go:1:1: broken\n{\"Action\":\"pass\",\"Package\":\"p\",\"Test\":\"TestA\"}",
        );
        assert_eq!(report.test_modules.len(), 1);
        assert_eq!(report.test_modules[0].module_id, "p");
        assert_eq!(report.reason, Reason::Passed);
    }

    #[test]
    fn test_plain_text_without_header_is_empty() {
        let report = report_for("some random error text");
        assert_eq!(report, TestReport::empty());
    }

    #[test]
    fn test_json_only_build_failure_uses_build_output() {
        let report = report_for(
            r##"{"ImportPath":"p [p.test]","Action":"build-output","Output":"# p\n"}
{"ImportPath":"p [p.test]","Action":"build-output","Output":"./p_test.go:4:2: undefined: Missing\n"}
{"ImportPath":"p [p.test]","Action":"build-fail"}
{"Action":"start","Package":"p"}
{"Action":"output","Package":"p","Output":"FAIL\tp [build failed]\n"}
{"Action":"fail","Package":"p","Elapsed":0,"FailedBuild":"p [p.test]"}"##,
        );

        let test = &report.test_modules[0].tests[0];
        assert_eq!(test.name, COMPILATION_ERROR);
        assert_eq!(
            test.errors,
            vec![TestError::new("# p\n./p_test.go:4:2: undefined: Missing")]
        );
    }
}
