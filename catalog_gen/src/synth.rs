//! Declaration synthesis.
//!
//! Assembles the companions of one enumeration from its rendered
//! alternatives. Every generated item carries the declaration's availability
//! and every per-alternative definition or arm carries the alternative's own.

use crate::errors::GenResult;
use crate::render::{ROOT_HANDLE, RenderContext, RenderedAlternative};
use crate::schema::VariantDecl;
use proc_macro2::{Ident, Span, TokenStream};
use quote::{ToTokens, TokenStreamExt, quote};
use syn::{Item, ItemEnum, ItemImpl};

/// The artifact set produced for one declaration, in emission order.
#[derive(Debug, Clone)]
pub struct GeneratedDecls {
    pub tags: ItemEnum,
    pub tags_impl: ItemImpl,
    pub bindings: ItemEnum,
    pub choice_accessor: ItemImpl,
    pub binding_constructor: ItemImpl,
    /* Absent when the declaration already conforms */
    pub conformance: Option<ItemImpl>,
}

impl GeneratedDecls {
    pub fn into_items(self) -> Vec<Item> {
        let mut items = vec![
            Item::Enum(self.tags),
            Item::Impl(self.tags_impl),
            Item::Enum(self.bindings),
            Item::Impl(self.choice_accessor),
            Item::Impl(self.binding_constructor),
        ];
        items.extend(self.conformance.map(Item::Impl));
        items
    }
}

impl ToTokens for GeneratedDecls {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.tags.to_tokens(tokens);
        self.tags_impl.to_tokens(tokens);
        self.bindings.to_tokens(tokens);
        self.choice_accessor.to_tokens(tokens);
        self.binding_constructor.to_tokens(tokens);
        tokens.append_all(&self.conformance);
    }
}

/* One alternative as seen by the synthesizer: rendering plus its own cfg */
struct Arm<'a> {
    availability: TokenStream,
    name: &'a Ident,
    rendered: &'a RenderedAlternative,
}

pub fn synthesize(
    decl: &VariantDecl,
    rendered: &[RenderedAlternative],
    ctx: &RenderContext,
    conform: bool,
) -> GenResult<GeneratedDecls> {
    let arms: Vec<Arm> = decl
        .alternatives
        .iter()
        .zip(rendered)
        .map(|(alternative, rendered)| Arm {
            availability: alternative.availability.to_token_stream(),
            name: &alternative.name,
            rendered,
        })
        .collect();

    Ok(GeneratedDecls {
        tags: syn::parse2(tags_enum(decl, &arms, ctx))?,
        tags_impl: syn::parse2(tags_impl(decl, &arms, ctx))?,
        bindings: syn::parse2(bindings_enum(decl, &arms, ctx))?,
        choice_accessor: syn::parse2(choice_accessor(decl, &arms, ctx))?,
        binding_constructor: syn::parse2(binding_constructor(decl, &arms, ctx))?,
        conformance: if conform {
            Some(syn::parse2(conformance(decl, ctx))?)
        } else {
            None
        },
    })
}

fn tags_enum(decl: &VariantDecl, arms: &[Arm], ctx: &RenderContext) -> TokenStream {
    let availability = &decl.availability;
    let vis = &decl.vis;
    let tags = &ctx.tags;
    let doc = format!(" Alternatives of [`{}`], without their fields.", decl.ident);
    let variants = arms.iter().map(|arm| &arm.rendered.tag_only);

    quote! {
        #availability
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #vis enum #tags {
            #( #variants, )*
        }
    }
}

fn tags_impl(decl: &VariantDecl, arms: &[Arm], ctx: &RenderContext) -> TokenStream {
    let availability = &decl.availability;
    let tags = &ctx.tags;
    let all = arms.iter().map(|arm| {
        let cfg = &arm.availability;
        let name = arm.name;
        quote! { #cfg #tags::#name }
    });
    let names = arms.iter().map(|arm| {
        let cfg = &arm.availability;
        let name = arm.name;
        let text = name.to_string();
        quote! { #cfg #tags::#name => #text }
    });

    quote! {
        #availability
        impl #tags {
            /// Every alternative, in declaration order.
            pub const ALL: &'static [#tags] = &[ #( #all, )* ];

            pub const fn name(self) -> &'static str {
                match self {
                    #( #names, )*
                }
            }
        }
    }
}

fn bindings_enum(decl: &VariantDecl, arms: &[Arm], ctx: &RenderContext) -> TokenStream {
    let availability = &decl.availability;
    let vis = &decl.vis;
    let bindings = &ctx.bindings;
    let doc = format!(
        " [`{}`] with every field exposed as a live two-way binding.",
        decl.ident
    );
    let variants = arms.iter().map(|arm| &arm.rendered.reference_typed);

    quote! {
        #availability
        #[doc = #doc]
        #[derive(Clone)]
        #vis enum #bindings {
            #( #variants, )*
        }
    }
}

fn choice_accessor(decl: &VariantDecl, arms: &[Arm], ctx: &RenderContext) -> TokenStream {
    let availability = &decl.availability;
    let vis = &decl.vis;
    let source = &decl.ident;
    let tags = &ctx.tags;
    let runtime = &ctx.runtime;
    let reads = arms.iter().map(|arm| {
        let cfg = &arm.availability;
        let pattern = &arm.rendered.read_pattern;
        let name = arm.name;
        quote! { #cfg #pattern => #tags::#name }
    });

    quote! {
        #availability
        impl #source {
            /// The alternative currently held.
            #vis fn choice(&self) -> #tags {
                match *self {
                    #( #reads, )*
                }
            }

            /// Replaces the value with the default instance of `choice`.
            #vis fn set_choice(&mut self, choice: #tags) {
                *self = <Self as #runtime::DefaultChoice>::default_for(choice);
            }
        }
    }
}

fn binding_constructor(decl: &VariantDecl, arms: &[Arm], ctx: &RenderContext) -> TokenStream {
    let availability = &decl.availability;
    let vis = &decl.vis;
    let source = &decl.ident;
    let bindings = &ctx.bindings;
    let runtime = &ctx.runtime;
    let root = Ident::new(ROOT_HANDLE, Span::call_site());
    let cases = arms.iter().map(|arm| {
        let cfg = &arm.availability;
        let pattern = &arm.rendered.pattern_capture;
        let rebuild = &arm.rendered.rebuild_expression;
        quote! { #cfg #pattern => #rebuild }
    });

    quote! {
        #availability
        impl #source {
            /// Bindings to the fields of the alternative `choice` holds now.
            ///
            /// Writing through a field binding stores a whole new alternative
            /// into `choice`. Every field type of the alternative must be
            /// `Clone`.
            #vis fn binding(#root: &#runtime::Binding<Self>) -> #bindings {
                match #root.get() {
                    #( #cases, )*
                }
            }
        }
    }
}

fn conformance(decl: &VariantDecl, ctx: &RenderContext) -> TokenStream {
    let availability = &decl.availability;
    let source = &decl.ident;
    let tags = &ctx.tags;
    let bindings = &ctx.bindings;
    let runtime = &ctx.runtime;
    let conformance_trait = &ctx.conformance_trait;

    quote! {
        #availability
        #[automatically_derived]
        impl #runtime::#conformance_trait for #source {
            type Tags = #tags;
            type Bindings = #bindings;

            fn choice(&self) -> Self::Tags {
                #source::choice(self)
            }

            fn set_choice(&mut self, choice: Self::Tags) {
                #source::set_choice(self, choice)
            }

            fn all_cases() -> ::std::vec::Vec<Self::Tags> {
                #tags::ALL.to_vec()
            }

            fn name_for(choice: Self::Tags) -> ::std::string::String {
                ::std::string::String::from(choice.name())
            }

            fn binding(choice: &#runtime::Binding<Self>) -> Self::Bindings {
                #source::binding(choice)
            }
        }
    }
}
