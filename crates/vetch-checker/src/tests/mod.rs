mod checker_tests;

use vetch_common::QualifiedName;
use vetch_common::Source;
use vetch_common::ast::{AccessChain, ClassDecl, FunctionDecl, Statement};
use vetch_env::Environment;

/// Single-module fixture: `A.foo` and `B.foo` both return `int`, `B.foo`
/// additionally threads through `A`.
pub(crate) fn two_class_env() -> Environment {
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
        );
    Environment::populate(&[source]).expect("populate")
}

pub(crate) fn chain(parts: &[&str]) -> AccessChain {
    let mut iter = parts.iter();
    let mut chain = AccessChain::ident(*iter.next().expect("chain head"));
    for part in iter {
        chain = match *part {
            "()" => chain.call0(),
            attr => chain.attr(attr),
        };
    }
    chain
}

pub(crate) fn assign(target: &str, parts: &[&str]) -> Statement {
    Statement::assign(target, chain(parts))
}
