//! The catalog served when no `SPACEWALK_CATALOG` is configured.
//!
//! One `examples` branch with two runnable jobs:
//!
//! ```text
//! /examples
//!   /examples/waste_time   examples_waste_time   (delay)
//!   /examples/fizz_buzz    examples_fizz_buzz    (n, fizzDivisor, buzzDivisor)
//! ```

use spacewalk::{
    Catalog, DeclarationError, Field, FieldKind, JobTypeDeclaration, ParamSchema, Registry,
};

pub fn catalog() -> Result<Catalog, DeclarationError> {
    let mut registry = Registry::new();

    let root = registry.register_root(
        JobTypeDeclaration::new("Spacewalk Example")
            .branch("examples")
            .description("example Spacewalk jobs"),
    )?;

    registry.register(
        root,
        JobTypeDeclaration::new("Waste Time Job")
            .leaf("waste_time")
            .description("Randomly logs while wasting time")
            .params(ParamSchema::new().field(
                "delay",
                Field::integer().required().describe("seconds to spend"),
            )),
    )?;

    registry.register(
        root,
        JobTypeDeclaration::new("FizzBuzz Job")
            .leaf("fizz_buzz")
            .description("Solve FizzBuzz with settable n, fizz & buzz divisors")
            .base_fields(ParamSchema::new().field(
                "output",
                Field::list(FieldKind::String).default_value(serde_json::json!([])),
            ))
            .params(
                ParamSchema::new()
                    .field("n", Field::integer().default_value(50))
                    .field("fizzDivisor", Field::integer().default_value(3))
                    .field("buzzDivisor", Field::integer().default_value(5)),
            ),
    )?;

    Ok(Catalog::new(registry, root))
}
