// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Colours for the outline tree and the source pane.
//!
//! `EBT_OUTLINE_PALETTE` overrides single roles as comma-separated `role=color` pairs, e.g.
//! `target=#d7af00,completed=lightgreen`. Colours use ratatui's names, `#RRGGBB` or an
//! ANSI index.

use std::{env, str::FromStr};

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

use crate::model::Mark;

pub(crate) const PALETTE_ENV: &str = "EBT_OUTLINE_PALETTE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ThemeError {
    #[error("invalid env {name}: value is not unicode")]
    NotUnicode { name: &'static str },
    #[error("invalid palette entry `{entry}` (expected role=color)")]
    Entry { entry: String },
    #[error("unknown palette role `{role}`")]
    UnknownRole { role: String },
    #[error("invalid color `{value}` for role `{role}`")]
    Color { role: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutlineTheme {
    target: Color,
    completed: Color,
    hit: Color,
    comment: Color,
    highlight: Color,
    error: Color,
}

impl Default for OutlineTheme {
    fn default() -> Self {
        Self {
            target: Color::Yellow,
            completed: Color::LightGreen,
            hit: Color::Cyan,
            comment: Color::Magenta,
            highlight: Color::DarkGray,
            error: Color::Red,
        }
    }
}

impl OutlineTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(PALETTE_ENV) {
            Ok(value) => Self::parse(&value),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ThemeError::NotUnicode { name: PALETTE_ENV }),
        }
    }

    /// Applies `role=color` overrides on top of the defaults. Blank input keeps the defaults.
    pub(crate) fn parse(spec: &str) -> Result<Self, ThemeError> {
        let mut theme = Self::default();
        for entry in spec.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let Some((role, value)) = entry.split_once('=') else {
                return Err(ThemeError::Entry { entry: entry.to_owned() });
            };
            let (role, value) = (role.trim(), value.trim());
            let color = Color::from_str(value).map_err(|_| ThemeError::Color {
                role: role.to_owned(),
                value: value.to_owned(),
            })?;
            let slot = match role {
                "target" => &mut theme.target,
                "completed" => &mut theme.completed,
                "hit" => &mut theme.hit,
                "comment" => &mut theme.comment,
                "highlight" => &mut theme.highlight,
                "error" => &mut theme.error,
                _ => return Err(ThemeError::UnknownRole { role: role.to_owned() }),
            };
            *slot = color;
        }
        Ok(theme)
    }

    pub(crate) fn mark_style(&self, mark: Mark) -> Style {
        match mark {
            Mark::Plain => Style::default(),
            Mark::Target => Style::default()
                .fg(self.target)
                .add_modifier(Modifier::BOLD),
            Mark::TargetCompleted => Style::default().fg(self.completed),
        }
    }

    /// Nodes of the active result set.
    pub(crate) fn hit_style(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.hit)
    }

    pub(crate) fn cursor_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn comment_style(&self) -> Style {
        Style::default().fg(self.comment)
    }

    /// Lines of the node shown in the source pane.
    pub(crate) fn highlight_style(&self) -> Style {
        Style::default().bg(self.highlight)
    }

    pub(crate) fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error)
            .add_modifier(Modifier::BOLD)
    }
}
