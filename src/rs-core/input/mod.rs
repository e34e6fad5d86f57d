mod keyboard;
mod pointer;

pub(crate) use keyboard::{map_key, KeyCommand};
pub(crate) use pointer::{
    double_click_offset, format_time, pointer_ratio, timeline_time, TapGuard, TimelineDrag,
};
