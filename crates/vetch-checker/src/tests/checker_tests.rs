use super::{assign, chain, two_class_env};
use crate::checker::{TypeChecker, entry_snapshot};
use crate::store::TypeResolutionStore;
use vetch_common::ast::{ClassDecl, FunctionDecl, Param, Statement};
use vetch_common::{Configuration, QualifiedName, Source, Ty, TypeSnapshot};
use vetch_env::Environment;

fn check(
    env: &Environment,
    config: &Configuration,
    name: &str,
) -> Vec<(vetch_common::PositionKey, TypeSnapshot)> {
    let store = TypeResolutionStore::new();
    let define = env.define(&QualifiedName::new(name)).expect("define");
    TypeChecker::new(env, config, &store)
        .check_define(define)
        .expect("check");
    store.get(&define.name).expect("records")
}

fn env_with_main(body: Vec<Statement>) -> Environment {
    let source = Source::new(QualifiedName::root())
        .class(
            ClassDecl::new("A")
                .field("count", "int")
                .method(FunctionDecl::new("foo").returns("int")),
        )
        .class(
            ClassDecl::new("B")
                .method(FunctionDecl::new("foo").returns("A"))
                .method(FunctionDecl::new("bar").returns("int")),
        )
        .function(FunctionDecl::new("main").body(body));
    Environment::populate(&[source]).expect("populate")
}

#[test]
fn parameters_seed_the_entry_snapshot() {
    let source = Source::new(QualifiedName::root())
        .class(ClassDecl::new("A"))
        .function(
            FunctionDecl::new("f")
                .param(Param::typed("a", "A"))
                .param(Param::typed("n", "int"))
                .param(Param::untyped("u")),
        );
    let env = Environment::populate(&[source]).expect("populate");
    let define = env.define(&QualifiedName::new("f")).expect("f");

    let snapshot = entry_snapshot(&env, define);
    assert_eq!(snapshot.get("a"), Some(&Ty::class("A")));
    assert_eq!(snapshot.get("n"), Some(&Ty::builtin("int")));
    assert!(snapshot.get("u").is_none());
}

#[test]
fn methods_bind_the_receiver() {
    let env = two_class_env();
    let define = env.define(&QualifiedName::new("B.bar")).expect("B.bar");
    let snapshot = entry_snapshot(&env, define);
    assert_eq!(snapshot.get("self"), Some(&Ty::class("B")));
}

#[test]
fn assignments_rebind_flow_sensitively() {
    // a = A(); a.foo(); a = B(); a.foo()
    let env = env_with_main(vec![
        assign("a", &["A", "()"]),
        Statement::Expr(chain(&["a", "foo", "()"])),
        assign("a", &["B", "()"]),
        Statement::Expr(chain(&["a", "foo", "()"])),
    ]);
    let records = check(&env, &Configuration::default(), "main");

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].1.get("a"), Some(&Ty::class("A")));
    assert_eq!(records[1].1.get("a"), Some(&Ty::class("A")));
    assert_eq!(records[2].1.get("a"), Some(&Ty::class("B")));
    assert_eq!(records[3].1.get("a"), Some(&Ty::class("B")));
}

#[test]
fn chained_calls_bind_the_threaded_type() {
    // a = B().foo().foo() - B.foo -> A, A.foo -> int.
    let env = env_with_main(vec![assign(
        "a",
        &["B", "()", "foo", "()", "foo", "()"],
    )]);
    let records = check(&env, &Configuration::default(), "main");
    assert_eq!(records[0].1.get("a"), Some(&Ty::builtin("int")));
}

#[test]
fn unresolvable_assignment_invalidates_the_target() {
    let env = env_with_main(vec![
        assign("a", &["A", "()"]),
        assign("a", &["mystery", "()"]),
    ]);
    let records = check(&env, &Configuration::default(), "main");
    assert_eq!(records[0].1.get("a"), Some(&Ty::class("A")));
    assert!(records[1].1.get("a").is_none());
}

#[test]
fn bare_signature_result_is_not_bound() {
    // a = b.foo - attribute lookup without a call is not a value.
    let env = env_with_main(vec![
        assign("b", &["B", "()"]),
        assign("a", &["b", "foo"]),
    ]);
    let records = check(&env, &Configuration::default(), "main");
    assert!(records[1].1.get("a").is_none());
}

#[test]
fn infer_off_disables_rebinding() {
    let env = env_with_main(vec![assign("a", &["A", "()"])]);
    let config = Configuration {
        infer: false,
        ..Configuration::default()
    };
    let records = check(&env, &config, "main");
    assert!(records[0].1.get("a").is_none());
}

#[test]
fn branch_agreement_survives_the_join() {
    let env = env_with_main(vec![
        Statement::If {
            condition: chain(&["flag"]),
            then_branch: vec![assign("x", &["A", "()"])],
            else_branch: vec![assign("x", &["A", "()"])],
        },
        Statement::Expr(chain(&["x", "foo", "()"])),
    ]);
    let records = check(&env, &Configuration::default(), "main");
    // Last record is the statement after the join.
    let last = &records.last().expect("records").1;
    assert_eq!(last.get("x"), Some(&Ty::class("A")));
}

#[test]
fn branch_disagreement_widens_to_unbound() {
    let env = env_with_main(vec![
        Statement::If {
            condition: chain(&["flag"]),
            then_branch: vec![assign("x", &["A", "()"])],
            else_branch: vec![assign("x", &["B", "()"])],
        },
        Statement::Expr(chain(&["x"])),
    ]);
    let records = check(&env, &Configuration::default(), "main");
    let last = &records.last().expect("records").1;
    assert!(last.get("x").is_none());
}

#[test]
fn loop_bodies_are_walked_once() {
    let env = env_with_main(vec![
        assign("a", &["A", "()"]),
        Statement::While {
            condition: chain(&["flag"]),
            body: vec![assign("a", &["B", "()"])],
        },
        Statement::Expr(chain(&["a"])),
    ]);
    let records = check(&env, &Configuration::default(), "main");
    // Rebinding inside the loop body is visible there...
    assert!(
        records
            .iter()
            .any(|(_, snapshot)| snapshot.get("a") == Some(&Ty::class("B")))
    );
    // ...and the after-loop point only keeps what the header proves.
    let last = &records.last().expect("records").1;
    assert_eq!(last.get("a"), Some(&Ty::class("A")));
}

#[test]
fn every_statement_gets_exactly_one_record() {
    let env = env_with_main(vec![
        assign("a", &["A", "()"]),
        Statement::If {
            condition: chain(&["flag"]),
            then_branch: vec![Statement::Return(Some(chain(&["a"])))],
            else_branch: vec![Statement::Expr(chain(&["a", "foo", "()"]))],
        },
        Statement::Return(None),
    ]);
    let records = check(&env, &Configuration::default(), "main");
    // assign, cond, then-return, else-expr, trailing return
    assert_eq!(records.len(), 5);
    let mut keys: Vec<_> = records.iter().map(|(key, _)| *key).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), 5, "position keys are unique per define");
}
