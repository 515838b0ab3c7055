//! Parsing the bundled sample scripts end to end
//!
//! Each sample exercises one statement family; the kitchen sink mixes them.

use au3::au3::ast::{Expression, Scope, Statement};
use au3::au3::testing::{assert_script, Samples};
use au3::parse_script;

fn sample(name: &str) -> au3::au3::ast::Script {
    let source = Samples::get(name).unwrap_or_else(|| panic!("unknown sample {name}"));
    parse_script(source).unwrap_or_else(|err| panic!("{name} failed to parse: {err}"))
}

#[test]
fn test_every_sample_parses() {
    for (name, source) in Samples::all() {
        assert!(parse_script(source).is_ok(), "{name} failed to parse");
    }
}

#[test]
fn test_directives() {
    let script = sample("000-directives.au3");

    assert_script(&script)
        .kinds(&[
            "Pragma",
            "Include",
            "Include",
            "OnAutoItStartRegister",
            "Flag",
            "Flag",
        ])
        .line(0, |line| {
            line.renders("#pragma compile(Icon, app.ico)");
        })
        .line(1, |line| {
            line.renders("#include <Array.au3>").comment("");
        })
        .line(2, |line| {
            line.line_number(3)
                .renders("#include \"helpers.au3\"")
                .comment("local helpers");
        })
        .line(3, |line| {
            assert_eq!(
                line.statement(),
                &Statement::OnAutoItStartRegister {
                    function_name: "Startup".into()
                }
            );
        })
        .line(5, |line| {
            line.renders("#RequireAdmin");
        });
}

#[test]
fn test_declarations() {
    let script = sample("010-declarations.au3");

    assert_script(&script)
        .line_count(7)
        .line(0, |line| {
            line.kind("Empty").comment("Declarations in every scope");
        })
        .line(1, |line| {
            line.assert_declaration()
                .scope(Scope::Local)
                .is_const(false)
                .names(&["$count", "$name"])
                .binding("$count", |value| {
                    value.renders("10");
                })
                .binding("$name", |value| {
                    value.equals(&Expression::value("Widget"));
                });
        })
        .line(2, |line| {
            line.assert_declaration()
                .scope(Scope::Global)
                .is_const(true)
                .binding("$MAX", |value| {
                    value.renders("255");
                });
        })
        .line(3, |line| {
            line.assert_declaration()
                .scope(Scope::Dim)
                .binding("$matrix", |value| {
                    value.kind("Array").child_count(2).renders("[[1, 2], [3, 4]]");
                });
        })
        .line(4, |line| {
            line.assert_declaration()
                .scope(Scope::Local)
                .is_const(true)
                .binding("$greeting", |value| {
                    value.equals(&Expression::value("Say \"hi\""));
                });
        })
        .line(5, |line| {
            line.renders("Local $total = (($count + 5) * (2 ^ 3)), $empty = \"\"");
        })
        .line(6, |line| {
            line.assert_declaration()
                .binding("$ready", |value| {
                    value
                        .renders("(Not ($count = 0) And IsArray($matrix))")
                        .child(0, |left| {
                            left.kind("Not");
                        });
                });
        });
}

#[test]
fn test_if_blocks() {
    let script = sample("020-if-blocks.au3");

    assert_script(&script)
        .kinds(&["VariableDeclaration", "Empty", "If", "Empty", "If"])
        .line(2, |line| {
            line.line_number(3)
                .assert_if()
                .branch_count(2)
                .has_else(true)
                .branch(0, |branch| {
                    branch.condition_renders("($x > 0)").body(|body| {
                        body.line_count(1).line(0, |inner| {
                            inner.line_number(4).renders("Local $sign = \"positive\"");
                        });
                    });
                })
                .branch(1, |branch| {
                    branch.condition_renders("($x < 0)");
                })
                .else_block(|block| {
                    block.line(0, |inner| {
                        inner.line_number(8).renders("Local $sign = \"zero\"");
                    });
                });
        })
        .line(4, |line| {
            line.line_number(11)
                .assert_if()
                .has_else(false)
                .branch(0, |branch| {
                    branch
                        .condition_renders("(@OSVersion = \"WIN_10\")")
                        .body(|body| {
                            body.line(0, |inner| {
                                inner.assert_if().branch(0, |nested| {
                                    nested.condition_renders("($x >= 5)").body(|body| {
                                        body.kinds(&["Flag"]).line(0, |flag| {
                                            flag.line_number(13);
                                        });
                                    });
                                });
                            });
                        });
                });
        });
}

#[test]
fn test_comment_blocks() {
    let script = sample("030-comments.au3");

    assert_script(&script)
        .kinds(&["CommentsBlock", "CommentsBlock", "VariableDeclaration"])
        .line(0, |line| {
            assert_eq!(
                line.statement(),
                &Statement::CommentsBlock {
                    text: "    This block is kept verbatim.\n    Even Local $x = \"not parsed\" ; stays here\n"
                        .into()
                }
            );
        })
        .line(1, |line| {
            let line = line.line_number(5);
            assert_eq!(line.statement(), &Statement::CommentsBlock { text: String::new() });
        })
        .line(2, |line| {
            line.line_number(7)
                .comment("parsed normally")
                .renders("Local $after = True");
        });
}

#[test]
fn test_kitchen_sink() {
    let script = sample("040-kitchen-sink.au3");

    assert_script(&script)
        .kinds(&[
            "Include",
            "Pragma",
            "Empty",
            "VariableDeclaration",
            "VariableDeclaration",
            "Empty",
            "CommentsBlock",
            "Empty",
            "If",
        ])
        .line(3, |line| {
            line.comment("application name")
                .renders("Global Const $APP = \"Demo\"");
        })
        .line(4, |line| {
            line.renders("Local $items = [1, 2.5, \"three\", Default], $n = UBound($items)");
        })
        .line(7, |line| {
            line.line_number(10);
        })
        .line(8, |line| {
            line.assert_if()
                .branch_count(2)
                .branch(0, |branch| {
                    branch
                        .condition_renders("(($n > 2) And ($APP <> \"\"))")
                        .body(|body| {
                            body.line(0, |inner| {
                                inner.renders("Dim $msg = ((($APP & \": \") & $n) & \" items\")");
                            });
                        });
                })
                .branch(1, |branch| {
                    branch.condition(|condition| {
                        condition.kind("Not").renders("Not IsArray($items)");
                    });
                });
        });
}

#[test]
fn test_rendering_reparses_to_the_same_tree() {
    for (name, source) in Samples::all() {
        let script = parse_script(source).unwrap();
        let rendered = script.to_source();
        let reparsed = parse_script(&rendered)
            .unwrap_or_else(|err| panic!("{name}: rendering does not parse: {err}\n{rendered}"));

        assert_eq!(reparsed, script, "{name}: tree changed after rendering");
        assert_eq!(reparsed.to_source(), rendered, "{name}: rendering is not stable");
    }
}
