use syn::{
    parenthesized,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    token, Attribute, Error, LitInt, LitStr, Result, Token,
};

mod kw {
    syn::custom_keyword!(name);
    syn::custom_keyword!(bases);
    syn::custom_keyword!(eq);
    syn::custom_keyword!(size);
}

pub struct Attrs<'a> {
    pub rtti: Option<RttiAttr<'a>>,
    pub attribute: Option<AttributeAttr<'a>>,
    pub tables: Vec<TableAttr<'a>>,
}

pub fn get(input: &[Attribute]) -> Result<Attrs<'_>> {
    let mut attrs = Attrs {
        rtti: None,
        attribute: None,
        tables: Vec::new(),
    };

    for attr in input {
        if attr.path.is_ident("rtti") {
            parse_rtti_attr(&mut attrs, attr)?;
        } else if attr.path.is_ident("attribute") {
            parse_attribute_attr(&mut attrs, attr)?;
        } else if attr.path.is_ident("table") {
            parse_table_attr(&mut attrs, attr)?;
        }
    }

    Ok(attrs)
}

/// #[rtti(..)]
///
/// Only on structs and enums.
pub struct RttiAttr<'a> {
    pub original: &'a Attribute,
    name: Option<LitStr>,
    pub bases: Vec<LitStr>,
    pub eq: bool,
}

impl<'a> RttiAttr<'a> {
    pub fn name(&self) -> Option<String> {
        self.name.as_ref().map(|name| name.value())
    }
}

fn parse_rtti_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    let rtti = attrs.rtti.get_or_insert_with(|| RttiAttr {
        original: attr,
        name: None,
        bases: Vec::new(),
        eq: false,
    });

    attr.parse_args_with(|input: ParseStream<'_>| {
        let mut first = true;
        while !input.is_empty() {
            if !first {
                input.parse::<Token![,]>()?;
            }

            let look = input.lookahead1();
            if look.peek(kw::name) {
                if rtti.name.is_some() {
                    return Err(Error::new_spanned(
                        attr,
                        "duplicate #[rtti(name)] attribute found",
                    ));
                }

                let AttrWrapper::<kw::name, LitStr> { value: name, .. } = input.parse()?;
                rtti.name = Some(name);
            } else if look.peek(kw::bases) {
                input.parse::<kw::bases>()?;
                let content;
                parenthesized!(content in input);
                let bases: Punctuated<LitStr, Token![,]> =
                    content.parse_terminated(<LitStr as Parse>::parse)?;
                rtti.bases.extend(bases);
            } else if look.peek(kw::eq) {
                input.parse::<kw::eq>()?;
                rtti.eq = true;
            } else {
                return Err(look.error());
            }

            first = false;
        }

        Ok(())
    })
}

/// #[attribute(..)]
///
/// Only on struct fields.
pub struct AttributeAttr<'a> {
    pub original: &'a Attribute,
    name: Option<LitStr>,
}

impl<'a> AttributeAttr<'a> {
    pub fn name(&self) -> Option<String> {
        self.name.as_ref().map(|name| name.value())
    }
}

fn parse_attribute_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    if attrs.attribute.is_some() {
        return Err(Error::new_spanned(
            attr,
            "duplicate #[attribute] attribute found",
        ));
    }
    let attribute = attrs.attribute.insert(AttributeAttr {
        original: attr,
        name: None,
    });

    // Allow the `#[attribute]` notation to be accepted.
    if attr.tokens.is_empty() {
        return Ok(());
    }

    attr.parse_args_with(|input: ParseStream<'_>| {
        let look = input.lookahead1();
        if look.peek(kw::name) {
            let AttrWrapper::<kw::name, LitStr> { value: name, .. } = input.parse()?;
            attribute.name = Some(name);
            Ok(())
        } else {
            Err(look.error())
        }
    })
}

/// #[table(name = "..", size = ..)]
///
/// Only on structs, may be repeated.
pub struct TableAttr<'a> {
    pub original: &'a Attribute,
    pub name: LitStr,
    pub size: Option<LitInt>,
}

fn parse_table_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    let (name, size) = attr.parse_args_with(|input: ParseStream<'_>| {
        let mut name = None;
        let mut size = None;

        let mut first = true;
        while !input.is_empty() {
            if !first {
                input.parse::<Token![,]>()?;
            }

            let look = input.lookahead1();
            if look.peek(kw::name) && name.is_none() {
                let AttrWrapper::<kw::name, LitStr> { value, .. } = input.parse()?;
                name = Some(value);
            } else if look.peek(kw::size) && size.is_none() {
                let AttrWrapper::<kw::size, LitInt> { value, .. } = input.parse()?;
                value.base10_parse::<usize>()?;
                size = Some(value);
            } else {
                return Err(look.error());
            }

            first = false;
        }

        Ok((name, size))
    })?;

    let name = name.ok_or_else(|| Error::new_spanned(attr, "#[table] requires a name"))?;
    attrs.tables.push(TableAttr {
        original: attr,
        name,
        size,
    });
    Ok(())
}

struct AttrWrapper<K, V> {
    #[allow(unused)] // Usually we don't care about the ident.
    pub ident: K,
    pub value: V,
}

impl<K: Parse, V: Parse> Parse for AttrWrapper<K, V> {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let ident = input.parse()?;
        let value = if input.peek(token::Paren) {
            // #[ident(value)]
            let value;
            parenthesized!(value in input);
            value.parse()?
        } else {
            // #[ident = value]
            input.parse::<Token![=]>()?;
            input.parse()?
        };

        Ok(Self { ident, value })
    }
}
