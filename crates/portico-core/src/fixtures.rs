//! Test fixtures for Portico development and testing.
//!
//! This module provides pre-populated contract builders that can be used in
//! tests across the Portico workspace.
//!
//! # Example
//!
//! ```
//! use portico_core::fixtures;
//!
//! # fn main() -> Result<(), portico_core::PorticoError> {
//! let mut builder = fixtures::greeter_contract()?;
//! let blueprint = builder.build()?;
//! assert_eq!(blueprint.operations().len(), 2);
//! # Ok(())
//! # }
//! ```

use crate::builder::ContractBuilder;
use crate::descriptor::{
    OperationDescriptor, ParameterDescriptor, ParameterSource, RestMapping, ResultDescriptor,
};
use crate::error::PorticoResult;
use crate::types::{Signature, TypeToken};
use http::Method;
use serde_json::json;

/// Creates a SOAP-style greeter contract.
///
/// - service `Greeter` in namespace `urn:demo`
/// - field `uid: string = "greeter-1"`
/// - `sayHello(text: string) -> string`
/// - `sayHello(text: string, times: integer) -> string`
///
/// # Errors
///
/// Propagates builder errors.
pub fn greeter_contract() -> PorticoResult<ContractBuilder> {
    let mut builder = ContractBuilder::new();
    builder
        .with_service("Greeter", "urn:demo")?
        .add_field(TypeToken::String, "uid", json!("greeter-1"))?
        .add_method(
            TypeToken::String,
            "sayHello",
            vec![ParameterDescriptor::new(TypeToken::String, "text")],
        )?
        .add_method(
            TypeToken::String,
            "sayHello",
            vec![
                ParameterDescriptor::new(TypeToken::String, "text"),
                ParameterDescriptor::new(TypeToken::Integer, "times"),
            ],
        )?;
    Ok(builder)
}

/// Signature of the single-argument `sayHello`.
#[must_use]
pub fn say_hello() -> Signature {
    Signature::new("sayHello", vec![TypeToken::String])
}

/// Creates a REST-style catalog contract rooted at `/items`.
///
/// - `GET /{id}` `getItem(id: path string) -> Item`
/// - `GET` `listItems(limit: query integer = 20, filter: bean) -> array<Item>`
/// - `POST` `createItem(item: Item) -> Item`, produces and consumes JSON
///
/// # Errors
///
/// Propagates builder errors.
pub fn catalog_contract() -> PorticoResult<ContractBuilder> {
    let item = TypeToken::named("Item");
    let mut builder = ContractBuilder::new();
    builder
        .with_path("/items")?
        .add_operation(
            ResultDescriptor::new(item.clone()),
            OperationDescriptor::new("getItem").rest(RestMapping::new(Method::GET).path("/{id}")),
            None,
            vec![ParameterDescriptor::rest(
                TypeToken::String,
                "id",
                ParameterSource::Path,
            )],
        )?
        .add_operation(
            ResultDescriptor::new(TypeToken::array(item.clone())),
            OperationDescriptor::new("listItems").rest(RestMapping::new(Method::GET)),
            None,
            vec![
                ParameterDescriptor::rest(TypeToken::Integer, "limit", ParameterSource::Query)
                    .default_value("20"),
                ParameterDescriptor::bean(TypeToken::named("ItemFilter")),
            ],
        )?
        .add_operation(
            ResultDescriptor::new(item.clone()),
            OperationDescriptor::new("createItem").rest(
                RestMapping::new(Method::POST)
                    .produces("application/json")
                    .consumes("application/json"),
            ),
            None,
            vec![ParameterDescriptor::new(item, "item")],
        )?;
    Ok(builder)
}
