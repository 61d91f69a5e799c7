// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Validation of the annotated function and extraction of what codegen
//! needs: parameter types, output type, generics and visibility.

use syn::{
    Error, FnArg, GenericParam, Ident, ItemFn, Result, ReturnType, Type, TypeParam, Visibility,
    parse_quote,
};

use crate::attributes::FuncAttributes;

/// Highest arity the runtime implements function-pointer support for.
const MAX_PARAMS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredVisibility {
    Public,
    Crate,
    Restricted,
    Private,
}

impl DeclaredVisibility {
    fn of(vis: &Visibility) -> Self {
        match vis {
            Visibility::Public(_) => DeclaredVisibility::Public,
            Visibility::Restricted(r) if r.in_token.is_none() && r.path.is_ident("crate") => {
                DeclaredVisibility::Crate
            }
            Visibility::Restricted(_) => DeclaredVisibility::Restricted,
            Visibility::Inherited => DeclaredVisibility::Private,
        }
    }

    pub fn variant(&self) -> Ident {
        let name = match self {
            DeclaredVisibility::Public => "Public",
            DeclaredVisibility::Crate => "Crate",
            DeclaredVisibility::Restricted => "Restricted",
            DeclaredVisibility::Private => "Private",
        };
        Ident::new(name, proc_macro2::Span::call_site())
    }
}

pub struct FuncAnalysis {
    pub item: ItemFn,
    pub attrs: FuncAttributes,
    pub visibility: DeclaredVisibility,
    pub param_types: Vec<Type>,
    pub output_type: Type,
    /// Type parameters with the bounds the runtime needs added.
    pub type_params: Vec<TypeParam>,
}

impl FuncAnalysis {
    pub fn analyze(item: ItemFn, attrs: FuncAttributes) -> Result<Self> {
        let sig = &item.sig;

        if let Some(token) = &sig.asyncness {
            return Err(Error::new_spanned(token, "pipevet::func does not support async functions"));
        }
        if let Some(token) = &sig.unsafety {
            return Err(Error::new_spanned(token, "pipevet::func does not support unsafe functions"));
        }
        if let Some(abi) = &sig.abi {
            return Err(Error::new_spanned(abi, "pipevet::func does not support extern functions"));
        }
        if let Some(variadic) = &sig.variadic {
            return Err(Error::new_spanned(variadic, "pipevet::func does not support variadic functions"));
        }
        if let Some(constness) = &sig.constness {
            return Err(Error::new_spanned(constness, "pipevet::func does not support const functions"));
        }

        let mut type_params = Vec::new();
        for param in &sig.generics.params {
            match param {
                GenericParam::Type(tp) => {
                    let mut tp = tp.clone();
                    tp.default = None;
                    tp.eq_token = None;
                    tp.bounds.push(parse_quote!(::std::marker::Send));
                    tp.bounds.push(parse_quote!(::std::marker::Sync));
                    tp.bounds.push(parse_quote!('static));
                    type_params.push(tp);
                }
                GenericParam::Lifetime(lt) => {
                    return Err(Error::new_spanned(
                        lt,
                        "pipevet::func does not support lifetime parameters; transform functions take owned values",
                    ));
                }
                GenericParam::Const(c) => {
                    return Err(Error::new_spanned(c, "pipevet::func does not support const generics"));
                }
            }
        }

        let mut param_types = Vec::new();
        for input in &sig.inputs {
            match input {
                FnArg::Receiver(receiver) => {
                    return Err(Error::new_spanned(
                        receiver,
                        "pipevet::func only applies to free functions, not methods",
                    ));
                }
                FnArg::Typed(pat_type) => {
                    check_owned(&pat_type.ty)?;
                    param_types.push((*pat_type.ty).clone());
                }
            }
        }
        if param_types.len() > MAX_PARAMS {
            return Err(Error::new_spanned(
                &sig.inputs,
                format!("pipevet::func supports at most {MAX_PARAMS} parameters"),
            ));
        }

        let output_type: Type = match &sig.output {
            ReturnType::Default => parse_quote!(()),
            ReturnType::Type(_, ty) => {
                check_owned(ty)?;
                (**ty).clone()
            }
        };

        Ok(Self {
            visibility: DeclaredVisibility::of(&item.vis),
            item,
            attrs,
            param_types,
            output_type,
            type_params,
        })
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

/// Parameter and output types must be `'static` and nameable in a function
/// pointer type.
fn check_owned(ty: &Type) -> Result<()> {
    match ty {
        Type::ImplTrait(_) => Err(Error::new_spanned(
            ty,
            "pipevet::func does not support `impl Trait` types; use a type parameter",
        )),
        Type::Reference(r) if r.lifetime.as_ref().is_none_or(|lt| lt.ident != "static") => {
            Err(Error::new_spanned(
                ty,
                "pipevet::func needs owned or 'static types; borrowed elements cannot cross a transform",
            ))
        }
        Type::Paren(inner) => check_owned(&inner.elem),
        Type::Tuple(tuple) => tuple.elems.iter().try_for_each(check_owned),
        _ => Ok(()),
    }
}
