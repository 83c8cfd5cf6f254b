// SPDX-License-Identifier: MIT

pub mod flow;
pub mod kit;
