use super::ast::{Call, Expression, Path, Visitor};
use super::operator::Operator;
use crate::error::{Error, Result, Side};
use crate::extract::Extractor;
use crate::values::Value;
use std::cmp::Ordering;
use tracing::trace;

/// Evaluates `expr` against `instance`, resolving paths with `extractor`.
pub fn evaluate<T, E>(expr: &Expression, instance: &T, extractor: &E) -> Result<Value>
where
    T: ?Sized,
    E: Extractor<T> + ?Sized,
{
    expr.accept(&mut Evaluator::new(instance, extractor))
}

/// Tree-walking interpreter bound to a single instance.
///
/// Arguments are always evaluated left to right before the operator is
/// applied; `AND` and `OR` do not short-circuit.
pub struct Evaluator<'a, T: ?Sized, E: ?Sized> {
    instance: &'a T,
    extractor: &'a E,
}

impl<'a, T, E> Evaluator<'a, T, E>
where
    T: ?Sized,
    E: Extractor<T> + ?Sized,
{
    pub fn new(instance: &'a T, extractor: &'a E) -> Self {
        Self {
            instance,
            extractor,
        }
    }

    fn equality(&mut self, op: Operator, args: &[Expression]) -> Result<bool> {
        let left = args[0].accept(self)?;
        let right = args[1].accept(self)?;
        Ok((op == Operator::Equal) == (left == right))
    }

    fn membership(&mut self, op: Operator, args: &[Expression]) -> Result<bool> {
        let left = args[0].accept(self)?;
        let items = match args[1].accept(self)? {
            Value::List(items) => items,
            Value::Null => {
                return Err(Error::NullOperand {
                    operator: op,
                    side: Side::Right,
                })
            }
            other => {
                return Err(Error::NotIterable {
                    operator: op,
                    found: other.kind(),
                })
            }
        };
        let found = items.iter().any(|item| *item == left);
        Ok((op == Operator::In) == found)
    }

    fn presence(&mut self, op: Operator, args: &[Expression]) -> Result<bool> {
        let absent = args[0].accept(self)?.is_null();
        Ok((op == Operator::IsAbsent) == absent)
    }

    fn logical(&mut self, op: Operator, args: &[Expression]) -> Result<bool> {
        let values = args
            .iter()
            .map(|arg| arg.accept(self))
            .collect::<Result<Vec<_>>>()?;
        Ok(match op {
            Operator::Or => values.contains(&Value::Bool(true)),
            _ => !values.contains(&Value::Bool(false)),
        })
    }

    fn ordering(
        &mut self,
        op: Operator,
        args: &[Expression],
        holds: fn(Ordering) -> bool,
    ) -> Result<bool> {
        let left = non_null(op, Side::Left, args[0].accept(self)?)?;
        let right = non_null(op, Side::Right, args[1].accept(self)?)?;
        let ord = left.compare(&right).ok_or(Error::Incomparable {
            operator: op,
            left: left.kind(),
            right: right.kind(),
        })?;
        Ok(holds(ord))
    }
}

fn non_null(operator: Operator, side: Side, value: Value) -> Result<Value> {
    if value.is_null() {
        return Err(Error::NullOperand { operator, side });
    }
    Ok(value)
}

impl<T, E> Visitor for Evaluator<'_, T, E>
where
    T: ?Sized,
    E: Extractor<T> + ?Sized,
{
    type Output = Result<Value>;

    fn visit_literal(&mut self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    fn visit_path(&mut self, path: &Path) -> Result<Value> {
        self.extractor.extract(self.instance, path)
    }

    fn visit_call(&mut self, call: &Call) -> Result<Value> {
        let op = call.operator();
        let args = call.arguments();
        let expected = op.arity();
        if !expected.accepts(args.len()) {
            return Err(Error::Arity {
                operator: op,
                expected,
                actual: args.len(),
            });
        }

        trace!(operator = %op, arguments = args.len(), "evaluating call");
        let result = match op {
            Operator::Equal | Operator::NotEqual => self.equality(op, args)?,
            Operator::In | Operator::NotIn => self.membership(op, args)?,
            Operator::IsAbsent | Operator::IsPresent => self.presence(op, args)?,
            Operator::And | Operator::Or => self.logical(op, args)?,
            Operator::GreaterThan => self.ordering(op, args, Ordering::is_gt)?,
            Operator::GreaterThanOrEqual => self.ordering(op, args, Ordering::is_ge)?,
            Operator::LessThan => self.ordering(op, args, Ordering::is_lt)?,
            Operator::LessThanOrEqual => self.ordering(op, args, Ordering::is_le)?,
        };
        Ok(Value::Bool(result))
    }

    fn visit_nil(&mut self) -> Result<Value> {
        Ok(Value::Bool(true))
    }
}
