//! Entity catalog: tagged record types resolved into labels and properties.
//!
//! A record type declares a tag per field (see [`tag`]) and optionally a
//! type-level label tag. The tags are compiled into an [`EntitySchema`] the
//! first time the type is used and cached for the life of the process; every
//! later resolution only reads field values.

pub mod descriptor;
pub mod errors;
pub mod schema;
pub mod tag;

pub use descriptor::{is_empty_value, to_property_value, EntityDescriptor, Labels};
pub use errors::EntityError;
pub use schema::{EntitySchema, FieldSpec, PropertySchema};

/// Field values of one record instance, keyed by field name.
pub type FieldValues = Vec<(&'static str, serde_json::Value)>;

/// A record type that can be rendered as a node.
///
/// Usually implemented through [`cypher_entity!`](crate::cypher_entity).
pub trait Entity {
    /// Compiled field table for this type.
    fn schema() -> Result<&'static EntitySchema, EntityError>
    where
        Self: Sized;

    /// Current field values in declaration order.
    fn field_values(&self) -> Result<FieldValues, EntityError>;

    fn describe(&self) -> Result<EntityDescriptor, EntityError>
    where
        Self: Sized,
    {
        Self::schema()?.describe(self.field_values()?)
    }
}

/// Declares a struct together with its [`Entity`] implementation.
///
/// ```
/// use cypher_norm::cypher_entity;
/// use cypher_norm::entity_catalog::Entity;
///
/// cypher_entity! {
///     #[derive(Debug, Clone, Default)]
///     pub struct User: "label:User,Person" {
///         pub username: String => "username",
///         pub age: i64 => "age,omitempty",
///         pub password: String => "-",
///     }
/// }
///
/// let user = User { username: "alice".into(), ..Default::default() };
/// let descriptor = user.describe().unwrap();
/// assert_eq!(descriptor.labels.as_slice(), &["User".to_string(), "Person".to_string()]);
/// assert!(descriptor.properties.contains_key("username"));
/// assert!(!descriptor.properties.contains_key("age"));
/// ```
///
/// Every field type must implement `serde::Serialize` and `Default`, including
/// excluded ones. `omitempty` drops a field only when it equals its type's
/// default, so an `Option<i64>` set to `Some(0)` is kept while `None` is not.
#[macro_export]
macro_rules! cypher_entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: $label_tag:literal)? {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty => $tag:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl $crate::entity_catalog::Entity for $name {
            fn schema() -> ::std::result::Result<
                &'static $crate::entity_catalog::EntitySchema,
                $crate::entity_catalog::EntityError,
            > {
                static SCHEMA: ::std::sync::OnceLock<
                    ::std::result::Result<
                        $crate::entity_catalog::EntitySchema,
                        $crate::entity_catalog::EntityError,
                    >,
                > = ::std::sync::OnceLock::new();

                SCHEMA
                    .get_or_init(|| {
                        let label_tags: &[&'static str] = &[$($label_tag)?];
                        let schema = $crate::entity_catalog::EntitySchema::compile(
                            stringify!($name),
                            label_tags.first().copied(),
                            &[
                                $(
                                    $crate::entity_catalog::FieldSpec {
                                        field: stringify!($field),
                                        tag: $tag,
                                    },
                                )*
                            ],
                        )?;
                        ::std::result::Result::Ok(schema.with_zero_values(::std::vec![
                            $(
                                (
                                    stringify!($field),
                                    $crate::entity_catalog::to_property_value(
                                        stringify!($field),
                                        &<$field_ty as ::std::default::Default>::default(),
                                    )?,
                                ),
                            )*
                        ]))
                    })
                    .as_ref()
                    .map_err(::std::clone::Clone::clone)
            }

            fn field_values(
                &self,
            ) -> ::std::result::Result<
                $crate::entity_catalog::FieldValues,
                $crate::entity_catalog::EntityError,
            > {
                ::std::result::Result::Ok(::std::vec![
                    $(
                        (
                            stringify!($field),
                            $crate::entity_catalog::to_property_value(stringify!($field), &self.$field)?,
                        ),
                    )*
                ])
            }
        }
    };
}
