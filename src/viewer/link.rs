// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Open-viewer link construction.
//!
//! Source URLs come in two shapes: a gitweb blob (`/gitweb/?p=…;a=blob_plain;…`) for git
//! revisions and a versioned project path (`projects/<proj>/<ver>/<path>`) otherwise.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::model::Payload;

/// How the analysed sources are versioned on the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ViewKind {
    #[serde(rename = "GITREV")]
    GitRev,
    #[default]
    #[serde(other)]
    Release,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GitRev => "GITREV",
            Self::Release => "RELEASE",
        }
    }
}

impl FromStr for ViewKind {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(if value == "GITREV" { Self::GitRev } else { Self::Release })
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project and view parameters shared by every link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkContext {
    pub proj: String,
    pub ver: String,
    pub view_kind: ViewKind,
    /// Revision (git) or version directory the sources are served from.
    pub view_id: String,
    pub algo: String,
    pub meth: String,
}

impl LinkContext {
    /// Gitweb project id: `proj` with a trailing `_git` turned into `.git`.
    pub fn pid(&self) -> String {
        match self.proj.strip_suffix("_git") {
            Some(stem) => format!("{stem}.git"),
            None => self.proj.clone(),
        }
    }

    pub fn locator(&self) -> SourceLocator {
        match self.view_kind {
            ViewKind::GitRev => SourceLocator::Gitweb {
                pid: self.pid(),
                rev: self.view_id.clone(),
            },
            ViewKind::Release => SourceLocator::Project {
                proj: self.proj.clone(),
                ver: self.view_id.clone(),
            },
        }
    }

    /// Source URL of a node's file (`src` of its open-viewer link).
    pub fn source_url(&self, payload: &Payload) -> String {
        let loc = payload.loc.as_deref().unwrap_or_default();
        match self.view_kind {
            ViewKind::GitRev => format!(
                "/gitweb/?p={};a=blob_plain;f={loc};h={};hb={}",
                self.pid(),
                payload.fid.as_deref().unwrap_or_default(),
                self.view_id
            ),
            ViewKind::Release => format!("projects/{}/{}/{loc}", self.proj, self.view_id),
        }
    }

    /// `openviewer?` link for a node.
    pub fn get_link(&self, payload: &Payload) -> String {
        let src = self.source_url(payload);
        let mut params = vec![
            ("proj", self.proj.clone()),
            ("algo", self.algo.clone()),
            ("meth", self.meth.clone()),
            ("path", payload.loc.as_deref().unwrap_or_default().to_owned()),
            ("ver", self.ver.clone()),
            ("src", src),
        ];
        let lines = (payload.sl.filter(|l| *l > 0), payload.el.filter(|l| *l > 0));
        if let (Some(sl), Some(el)) = lines {
            params.push(("startl", sl.to_string()));
            params.push(("endl", el.to_string()));
        }
        encode_query("openviewer?", &params)
    }
}

fn encode_query(head: &str, params: &[(&str, String)]) -> String {
    let mut out = String::from(head);
    for (i, (name, value)) in params.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(name);
        out.push('=');
        out.push_str(&urlencoding::encode(value));
    }
    out
}

/// Where a source file lives, used to point definition links at sibling files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    Gitweb { pid: String, rev: String },
    Project { proj: String, ver: String },
}

impl SourceLocator {
    /// Recovers the locator from an already built source URL. `None` for unknown shapes.
    pub fn sniff(url: &str) -> Option<Self> {
        if url.starts_with("/gitweb") {
            let caps = gitweb_re().captures(url)?;
            Some(Self::Gitweb { pid: caps[1].to_owned(), rev: caps[2].to_owned() })
        } else if url.starts_with("projects") {
            let caps = project_re().captures(url)?;
            Some(Self::Project { proj: caps[1].to_owned(), ver: caps[2].to_owned() })
        } else {
            None
        }
    }

    pub fn src_for(&self, path: &str) -> String {
        match self {
            Self::Gitweb { pid, rev } => format!("/gitweb/?p={pid};a=blob_plain;f={path};hb={rev}"),
            Self::Project { proj, ver } => format!("projects/{proj}/{ver}/{path}"),
        }
    }

    /// Revision or version component.
    pub fn version(&self) -> &str {
        match self {
            Self::Gitweb { rev, .. } => rev,
            Self::Project { ver, .. } => ver,
        }
    }

    /// Open-viewer link to `line` of the file at `path`.
    pub fn definition_link(&self, path: &str, line: u32) -> String {
        format!(
            "openviewer?path={}&src={}&ver={}&startl={line}&endl={line}",
            urlencoding::encode(path),
            urlencoding::encode(&self.src_for(path)),
            self.version()
        )
    }
}

fn gitweb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/gitweb/\?p=([^;]+);a=blob_plain;.+;hb=(.+)$").expect("valid gitweb pattern")
    })
}

fn project_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"projects/([^/]+)/([^/]+)/.+$").expect("valid project pattern"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{LinkContext, SourceLocator, ViewKind};
    use crate::model::Payload;

    fn context(view_kind: ViewKind) -> LinkContext {
        LinkContext {
            proj: "demo_git".to_owned(),
            ver: "v2".to_owned(),
            view_kind,
            view_id: "v2".to_owned(),
            algo: "ebt".to_owned(),
            meth: "survey".to_owned(),
        }
    }

    fn payload(sl: Option<u32>, el: Option<u32>) -> Payload {
        Payload {
            loc: Some("src/x.f90".into()),
            fid: Some("deadbeef".into()),
            sl,
            el,
            ..Payload::default()
        }
    }

    #[test]
    fn gitrev_link_points_at_gitweb_blob() {
        let ctx = context(ViewKind::GitRev);
        assert_eq!(ctx.pid(), "demo.git");
        assert_eq!(
            ctx.source_url(&payload(None, None)),
            "/gitweb/?p=demo.git;a=blob_plain;f=src/x.f90;h=deadbeef;hb=v2"
        );
        assert_eq!(
            ctx.get_link(&payload(Some(3), Some(9))),
            "openviewer?proj=demo_git&algo=ebt&meth=survey&path=src%2Fx.f90&ver=v2\
             &src=%2Fgitweb%2F%3Fp%3Ddemo.git%3Ba%3Dblob_plain%3Bf%3Dsrc%2Fx.f90%3Bh%3Ddeadbeef%3Bhb%3Dv2\
             &startl=3&endl=9"
        );
    }

    #[rstest]
    #[case(None, Some(9))]
    #[case(Some(0), Some(9))]
    #[case(Some(3), None)]
    fn line_range_needs_both_ends(#[case] sl: Option<u32>, #[case] el: Option<u32>) {
        let link = context(ViewKind::Release).get_link(&payload(sl, el));
        assert!(link.ends_with("&src=projects%2Fdemo_git%2Fv2%2Fsrc%2Fx.f90"), "{link}");
    }

    #[test]
    fn sniffing_matches_both_url_shapes() {
        let ctx = context(ViewKind::GitRev);
        let url = ctx.source_url(&payload(None, None));
        let locator = SourceLocator::sniff(&url).expect("gitweb");
        assert_eq!(locator, ctx.locator());
        assert_eq!(
            locator.src_for("src/y.f90"),
            "/gitweb/?p=demo.git;a=blob_plain;f=src/y.f90;hb=v2"
        );

        let locator = SourceLocator::sniff("projects/demo/v1/src/x.f90").expect("project");
        assert_eq!(
            locator.definition_link("src/k.f90", 7),
            "openviewer?path=src%2Fk.f90&src=projects%2Fdemo%2Fv1%2Fsrc%2Fk.f90&ver=v1&startl=7&endl=7"
        );
        assert_eq!(SourceLocator::sniff("http://elsewhere/x.f90"), None);
    }

    #[test]
    fn view_kind_parses_leniently() {
        assert_eq!("GITREV".parse::<ViewKind>(), Ok(ViewKind::GitRev));
        assert_eq!("RELEASE".parse::<ViewKind>(), Ok(ViewKind::Release));
        assert_eq!("anything".parse::<ViewKind>(), Ok(ViewKind::Release));
    }
}
