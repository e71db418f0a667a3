#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unreadable_literal
)]

pub(crate) use cb_core::structs::{Command, Context, Error};

mod fun;
mod levels;
mod meta;
mod pokemon;

#[must_use]
pub fn commands() -> Vec<Command> {
    meta::commands()
        .into_iter()
        .chain(pokemon::commands())
        .chain(levels::commands())
        .chain(fun::commands())
        .collect()
}
