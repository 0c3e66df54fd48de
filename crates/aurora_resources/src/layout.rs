//! Room layouts (`.lyt`)
//!
//! A layout is a text file placing the room models of an area:
//!
//! ```text
//! #MAXLAYOUT ASCII
//! filedependancy tar_m02aa.max
//! beginlayout
//! roomcount 2
//!    tar_m02aa_01 100.0 80.0 0.0
//!    tar_m02aa_02 120.0 80.0 0.0
//! trackcount 0
//! obstaclecount 0
//! doorhookcount 1
//!    tar_m02aa_01 door_01 0 110.0 80.0 0.0 0.707 0.0 0.0 -0.707
//! donelayout
//! ```
//!
//! Everything before `beginlayout` is ignored. Each section starts with its count and is followed
//! by exactly that many lines.

use aurora_common::coords::position_from_raw;
use glam::Vec3;
use winnow::ascii::{dec_uint, float, line_ending, space0, space1};
use winnow::combinator::{
    alt, dispatch, eof, fail, preceded, repeat, rest, separated, seq, terminated, trace,
};
use winnow::error::{ContextError, StrContext};
use winnow::prelude::*;
use winnow::token::{take_till, take_until};
use winnow::PResult;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

type Stream<'i> = &'i str;

/// A named point of the layout: a room, a track or an obstacle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutEntry {
    /// Model name
    pub name: String,
    /// Position of the model origin
    pub position: Vec3,
}

/// A door hook, kept as the tokens of its line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DoorHook {
    pub tokens: Vec<String>,
}

impl DoorHook {
    /// Room the hook belongs to
    pub fn room(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Name of the hook
    pub fn name(&self) -> Option<&str> {
        self.tokens.get(1).map(String::as_str)
    }
}

/// Decoded room layout of an area
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    pub rooms: Vec<LayoutEntry>,
    pub tracks: Vec<LayoutEntry>,
    pub obstacles: Vec<LayoutEntry>,
    pub door_hooks: Vec<DoorHook>,
}

enum Section {
    Rooms(Vec<LayoutEntry>),
    Tracks(Vec<LayoutEntry>),
    Obstacles(Vec<LayoutEntry>),
    DoorHooks(Vec<DoorHook>),
}

impl Layout {
    /// Parse the text of a layout file
    pub fn parse(text: &str) -> Result<Layout> {
        layout.parse(text).map_err(|e| Error::InvalidLayout {
            offset: e.offset(),
            message: e.inner().to_string(),
        })
    }

    /// Find a room by name, ignoring case
    pub fn room(&self, name: &str) -> Option<&LayoutEntry> {
        self.rooms
            .iter()
            .find(|room| room.name.eq_ignore_ascii_case(name))
    }
}

fn token<'s>(s: &mut Stream<'s>) -> PResult<&'s str> {
    take_till(1.., |c: char| c.is_ascii_whitespace()).parse_next(s)
}

fn end_of_line(s: &mut Stream<'_>) -> PResult<()> {
    (space0, alt((line_ending, eof))).void().parse_next(s)
}

fn blank_lines(s: &mut Stream<'_>) -> PResult<()> {
    repeat(0.., (space0, line_ending)).parse_next(s)
}

fn position(s: &mut Stream<'_>) -> PResult<Vec3> {
    (float, preceded(space1, float), preceded(space1, float))
        .map(|(x, y, z): (f32, f32, f32)| position_from_raw(x, y, z))
        .parse_next(s)
}

fn entry(s: &mut Stream<'_>) -> PResult<LayoutEntry> {
    trace(
        "entry",
        seq!(LayoutEntry {
            _: space0,
            name: token.map(str::to_owned),
            _: space1,
            position: position,
            _: end_of_line,
        }),
    )
    .parse_next(s)
}

fn door_hook(s: &mut Stream<'_>) -> PResult<DoorHook> {
    trace(
        "door_hook",
        seq!(DoorHook {
            _: space0,
            tokens: separated(1.., token.map(str::to_owned), space1),
            _: end_of_line,
        }),
    )
    .parse_next(s)
}

fn counted<'s, O, P>(mut item: P) -> impl Parser<Stream<'s>, Vec<O>, ContextError>
where
    P: Parser<Stream<'s>, O, ContextError>,
{
    move |s: &mut Stream<'s>| {
        let count = terminated(dec_uint::<_, u32, _>, end_of_line)
            .context(StrContext::Label("count"))
            .parse_next(s)?;
        repeat(count as usize, item.by_ref()).parse_next(s)
    }
}

fn section(s: &mut Stream<'_>) -> PResult<Section> {
    trace(
        "section",
        dispatch! {preceded(space0, (token, space1)).map(|(keyword, _)| keyword);
            "roomcount" => counted(entry).map(Section::Rooms),
            "trackcount" => counted(entry).map(Section::Tracks),
            "obstaclecount" => counted(entry).map(Section::Obstacles),
            "doorhookcount" => counted(door_hook).map(Section::DoorHooks),
            _ => fail::<_, Section, _>,
        },
    )
    .parse_next(s)
}

fn layout(s: &mut Stream<'_>) -> PResult<Layout> {
    (take_until(0.., "beginlayout"), "beginlayout", end_of_line)
        .void()
        .parse_next(s)?;

    let sections: Vec<Section> = repeat(0.., preceded(blank_lines, section)).parse_next(s)?;

    (blank_lines, space0, "donelayout", rest)
        .void()
        .context(StrContext::Label("donelayout"))
        .parse_next(s)?;

    let mut layout = Layout::default();
    for section in sections {
        match section {
            Section::Rooms(rooms) => layout.rooms.extend(rooms),
            Section::Tracks(tracks) => layout.tracks.extend(tracks),
            Section::Obstacles(obstacles) => layout.obstacles.extend(obstacles),
            Section::DoorHooks(hooks) => layout.door_hooks.extend(hooks),
        }
    }
    Ok(layout)
}
