use syn::{Data, DeriveInput, Error, Generics, Ident, Result};

use crate::attrs::{self, Attrs};

pub struct Input<'a> {
    pub attrs: Attrs<'a>,
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub fields: Vec<Field<'a>>,
}

pub struct Field<'a> {
    pub attrs: Attrs<'a>,
    pub ident: &'a Ident,
}

impl<'a> Input<'a> {
    /// Fields are only collected for `attributed` inputs,
    /// which must be structs with named fields.
    pub fn from_syn(node: &'a DeriveInput, attributed: bool) -> Result<Self> {
        let fields = match &node.data {
            Data::Union(_) => {
                return Err(Error::new_spanned(node, "unions are not supported"));
            }
            _ if !attributed => Vec::new(),
            Data::Struct(data) => data
                .fields
                .iter()
                .map(Field::from_syn)
                .collect::<Result<_>>()?,
            Data::Enum(_) => {
                return Err(Error::new_spanned(node, "enums cannot be attributed"));
            }
        };

        let input = Self {
            attrs: attrs::get(&node.attrs)?,
            ident: &node.ident,
            generics: &node.generics,
            fields,
        };
        input.validate()?;

        Ok(input)
    }

    fn validate(&self) -> Result<()> {
        if let Some(attribute) = &self.attrs.attribute {
            return Err(Error::new_spanned(
                attribute.original,
                "unexpected #[attribute] attribute only allowed on struct fields",
            ));
        }

        for field in &self.fields {
            if let Some(rtti) = &field.attrs.rtti {
                return Err(Error::new_spanned(
                    rtti.original,
                    "unexpected #[rtti] attribute only allowed on structs and enums",
                ));
            }
            if let Some(table) = field.attrs.tables.first() {
                return Err(Error::new_spanned(
                    table.original,
                    "unexpected #[table] attribute only allowed on structs",
                ));
            }
        }

        Ok(())
    }

    pub fn name(&self) -> String {
        self.attrs
            .rtti
            .as_ref()
            .and_then(|r| r.name())
            .unwrap_or_else(|| self.ident.to_string())
    }

    /// Fields marked as prescribed attributes, in order.
    pub fn attributes(&self) -> impl Iterator<Item = &Field<'a>> + '_ {
        self.fields.iter().filter(|f| f.attrs.attribute.is_some())
    }
}

impl<'a> Field<'a> {
    fn from_syn(node: &'a syn::Field) -> Result<Self> {
        Ok(Self {
            attrs: attrs::get(&node.attrs)?,
            ident: node.ident.as_ref().ok_or_else(|| {
                Error::new_spanned(node, "tuple struct fields cannot be attributed")
            })?,
        })
    }

    pub fn name(&self) -> String {
        self.attrs
            .attribute
            .as_ref()
            .and_then(|a| a.name())
            .unwrap_or_else(|| self.ident.to_string())
    }
}
