use crate::{env::Env, error::Error, mask::DataMask, value::Value, Interpreter};
use std::rc::Rc;
use tidy_syntax::{Arg, Binop, Node};

/// Copy `template`, replacing every `!!x` with the code for the value of `x`.
///
/// `x` is evaluated in `env` (under `mask`, if there is one). Calls to `quote`
/// are copied untouched.
pub fn quasiquote(
    interpreter: &mut Interpreter,
    template: &Node,
    env: &Env,
    mask: Option<&DataMask>,
) -> Result<Node, Error> {
    if let Some(operand) = template.splice_operand() {
        return Err(Error::NotRepresentable {
            what: format!("`!!!{}` outside of an argument list", operand),
        });
    }

    if let Some(operand) = template.unquote_operand() {
        let value = interpreter.eval(operand, env, mask)?;
        log::trace!("unquoted {} as {}", operand, value.render());
        return value.to_node();
    }

    match template {
        Node::Call(call) => {
            if template.is_call_to("quote") {
                return Ok(template.clone());
            }
            let callee = quasiquote(interpreter, &call.callee, env, mask)?;
            let args = quasiquote_args(interpreter, &call.args, env, mask)?;
            Ok(Node::call(callee, args))
        }
        Node::PairList(formals) => {
            let formals = formals
                .iter()
                .map(|formal| {
                    let value = if formal.value.is_missing() {
                        Node::Missing
                    } else {
                        quasiquote(interpreter, &formal.value, env, mask)?
                    };
                    Ok(Arg {
                        name: formal.name.clone(),
                        value,
                    })
                })
                .collect::<Result<Vec<_>, Error>>()?;
            Ok(Node::PairList(Rc::from(formals)))
        }
        Node::Constant(_) | Node::Symbol(_) | Node::Missing => Ok(template.clone()),
    }
}

/// Quasiquote an argument list, where `!!!xs` and `name := value` are also allowed.
pub(crate) fn quasiquote_args(
    interpreter: &mut Interpreter,
    args: &[Arg],
    env: &Env,
    mask: Option<&DataMask>,
) -> Result<Vec<Arg>, Error> {
    let mut result = Vec::with_capacity(args.len());
    for arg in args {
        if let Some(operand) = arg.value.splice_operand() {
            if let Some(name) = &arg.name {
                return Err(Error::NotRepresentable {
                    what: format!("`{} = !!!{}` as an argument", name, operand),
                });
            }
            let value = interpreter.eval(operand, env, mask)?;
            log::trace!("splicing {} into the argument list", value.render());
            splice_value(&value, &mut result)?;
            continue;
        }

        if arg.name.is_none() {
            if let Some((Binop::Walrus, lhs, rhs)) = arg.value.binop_operands() {
                let name = argument_name(interpreter, lhs, env, mask)?;
                let value = quasiquote(interpreter, rhs, env, mask)?;
                result.push(Arg {
                    name: Some(name),
                    value,
                });
                continue;
            }
        }

        let value = quasiquote(interpreter, &arg.value, env, mask)?;
        result.push(Arg {
            name: arg.name.clone(),
            value,
        });
    }
    Ok(result)
}

fn splice_value(value: &Value, args: &mut Vec<Arg>) -> Result<(), Error> {
    match value {
        Value::Null => {}
        Value::List(items) => {
            for (name, item) in items.iter() {
                args.push(Arg {
                    name: name.clone(),
                    value: item.to_node()?,
                })
            }
        }
        Value::Num(values) => {
            args.extend(values.iter().map(|value| Arg::positional(Node::num(*value))))
        }
        other => args.push(Arg::positional(other.to_node()?)),
    }
    Ok(())
}

/// The name on the left of `:=`, either written directly or unquoted.
fn argument_name(
    interpreter: &mut Interpreter,
    lhs: &Node,
    env: &Env,
    mask: Option<&DataMask>,
) -> Result<Rc<str>, Error> {
    let value = match lhs.unquote_operand() {
        Some(operand) => interpreter.eval(operand, env, mask)?,
        None => Value::from_node(lhs.clone()),
    };
    match value {
        Value::Str(name) | Value::Lang(Node::Symbol(name)) => Ok(name),
        other => Err(Error::NotRepresentable {
            what: format!("a {} as an argument name", other.type_name()),
        }),
    }
}
