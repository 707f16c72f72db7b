// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod arithmetic;
pub mod change_text_case;
pub mod concat;
pub mod echo;

pub use arithmetic::*;
pub use change_text_case::*;
pub use concat::*;
pub use echo::*;
