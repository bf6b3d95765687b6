// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in outlines for `--demo`, tests and benches.

use super::ids::NodeId;
use super::label::LabelState;
use super::node::{Node, NodeKind, Payload};
use super::session::Session;
use super::tables::SideTables;
use super::tree::Tree;
use crate::format::jstree::{load_session, TreeLoadError};

/// A small two-file Fortran outline in the backend's record format.
pub const DEMO_OUTLINE_JSON: &str = r#"[
  {"id": "f1", "text": "src/main.f90", "type": "file", "loc": "src/main.f90", "fid": "a1b2c3",
   "state": {"opened": true},
   "node_tbl": {
     "src/main.f90": {"10": ["l1"], "11": ["l2"]},
     "src/kernel.f90": {"5": ["l3", "l3b"], "15": ["l4"]}
   },
   "callees_tbl": {"compute": ["s1"]},
   "targets": ["l3", "l1"],
   "last_nid": "l2",
   "children": [
     {"id": "p1", "text": "program main", "type": "main", "loc": "src/main.f90",
      "fid": "a1b2c3", "pu": "main", "sl": 1, "el": 40, "idx": 9, "lmi": 1,
      "code": "program main", "state": {"opened": true},
      "children": [
        {"id": "l1", "text": "do i = 1, n", "type": "loop", "loc": "src/main.f90",
         "fid": "a1b2c3", "pu": "main", "sl": 10, "el": 20, "idx": 4, "lmi": 1,
         "code": "do i = 1, n", "relevant": true, "target": true, "judgment": "NotYet",
         "bf0": 1.25, "bf1": 2.5, "bf2": 0.75,
         "other_metrics": {"FOp": 12, "St": 9, "Br": 1},
         "children": [
           {"id": "l2", "text": "do j = 1, m", "type": "loop", "loc": "src/main.f90",
            "fid": "a1b2c3", "pu": "main", "sl": 11, "el": 19, "idx": 3, "lmi": 1,
            "code": "do j = 1, m", "relevant": true, "bf0": 0.5, "bf1": 1.0, "bf2": 0.0,
            "children": [
              {"id": "c1", "text": "call compute(a, i, j)", "type": "call",
               "loc": "src/main.f90", "fid": "a1b2c3", "pu": "main", "sl": 12, "el": 12,
               "idx": 1, "lmi": 1, "code": "call compute(a, i, j)", "callee": "compute",
               "nlinks": 1,
               "aref_ranges": "[{\"start\":{\"line\":12,\"ch\":11},\"end\":{\"line\":12,\"ch\":17},\"def\":{\"line\":1,\"path\":\"src/kernel.f90\",\"code\":\"subroutine compute(a, i, j)\"}},{\"start\":{\"line\":12,\"ch\":19},\"end\":{\"line\":12,\"ch\":19},\"def\":{\"line\":4}},{\"start\":{\"line\":12,\"ch\":22},\"end\":{\"line\":12,\"ch\":22}}]",
               "children": []}
            ]}
         ]},
        {"id": "c2", "text": "call output(a)", "type": "call*", "loc": "src/main.f90",
         "fid": "a1b2c3", "pu": "main", "sl": 30, "el": 30, "idx": 8, "lmi": 8,
         "code": "call output(a)", "callee": "output", "children": []}
      ]}
   ]},
  {"id": "f2", "text": "src/kernel.f90", "type": "file", "loc": "src/kernel.f90",
   "fid": "d4e5f6", "state": {"opened": true},
   "children": [
     {"id": "s1", "text": "subroutine compute(a, i, j)", "type": "subroutine",
      "loc": "src/kernel.f90", "fid": "d4e5f6", "pu": "compute", "sl": 1, "el": 25,
      "idx": 16, "lmi": 10, "code": "subroutine compute(a, i, j)",
      "children": [
        {"id": "l3", "text": "do k = 1, 8", "type": "loop", "loc": "src/kernel.f90",
         "fid": "d4e5f6", "pu": "compute", "sl": 5, "el": 7, "idx": 11, "lmi": 10,
         "code": "do k = 1, 8", "relevant": true, "target": true, "checked": true,
         "bf0": 3.0, "bf1": 1.5, "bf2": 1.0, "comment": "vectorize this?",
         "children": [
           {"id": "l3b", "text": "do kk = 1, 2", "type": "loop", "loc": "src/kernel.f90",
            "fid": "d4e5f6", "pu": "compute", "sl": 5, "el": 7, "idx": 10, "lmi": 10,
            "code": "do kk = 1, 2", "relevant": true, "children": []}
         ]},
        {"id": "b1", "text": "if (a(i) > 0) then", "type": "branch", "loc": "src/kernel.f90",
         "fid": "d4e5f6", "pu": "compute", "sl": 14, "el": 18, "idx": 15, "lmi": 12,
         "code": "if (a(i) > 0) then",
         "children": [
           {"id": "l4", "text": "do k = 1, 4", "type": "loop", "loc": "src/kernel.f90",
            "fid": "d4e5f6", "pu": "compute", "sl": 15, "el": 17, "idx": 14, "lmi": 12,
            "code": "do k = 1, 4", "relevant": true, "checked": true, "children": []}
         ]}
      ]}
   ]}
]"#;

/// Source text served for the demo outline, keyed by path.
pub fn demo_source(path: &str) -> Option<&'static str> {
    match path {
        "src/main.f90" => Some(DEMO_MAIN_F90),
        "src/kernel.f90" => Some(DEMO_KERNEL_F90),
        _ => None,
    }
}

const DEMO_MAIN_F90: &str = "program main
  implicit none
  integer, parameter :: n = 100, m = 50
  real :: a(n)
  integer :: i, j

  a = 0.0


  do i = 1, n
    do j = 1, m
      call compute(a, i, j)
    end do
  end do















  call output(a)









end program main
";

const DEMO_KERNEL_F90: &str = "subroutine compute(a, i, j)
  real :: a(*)
  integer :: i, j, k, kk

  do k = 1, 8; do kk = 1, 2
    a(i) = a(i) + real(k * kk + j)
  end do; end do






  if (a(i) > 0) then
    do k = 1, 4
      a(i) = a(i) * 0.5
    end do
  end if






end subroutine compute
";

pub fn demo_session() -> Result<Session, TreeLoadError> {
    load_session(DEMO_OUTLINE_JSON)
}

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

/// `count` top-level files with `loops` nested loops each, every third loop relevant.
pub fn wide_session(count: usize, loops: usize) -> Session {
    let mut builder = Tree::builder();
    for file in 0..count {
        let file_id = nid(&format!("f{file}"));
        let loc = format!("src/file{file}.f90");
        let payload = Payload { loc: Some(loc.as_str().into()), ..Payload::default() };
        let node = Node::new(file_id.clone(), NodeKind::File, LabelState::new(&loc), payload);
        builder.insert(None, node).expect("file node");

        let mut parent = file_id;
        for depth in 0..loops {
            let id = nid(&format!("f{file}l{depth}"));
            let line = u32::try_from(depth * 3 + 1).unwrap_or(u32::MAX);
            let code = format!("do i{depth} = 1, n  ! loop {depth} of file {file}");
            let payload = Payload {
                loc: Some(loc.as_str().into()),
                sl: Some(line),
                el: Some(line + 2),
                relevant: depth % 3 == 0,
                code: Some(code.clone()),
                pu: Some("main".into()),
                ..Payload::default()
            };
            let node = Node::new(id.clone(), NodeKind::Loop, LabelState::new(code), payload);
            builder.insert(Some(&parent), node).expect("loop node");
            parent = id;
        }
    }
    Session::new(builder.finish(), SideTables::default())
}
