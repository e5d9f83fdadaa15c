use super::{FilterArgs, FilterChainMut};
use crate::core::{MediaType, Video};
use crate::error::BuildResult;

const V: MediaType = MediaType::Video;

impl<'a> FilterChainMut<'a, Video> {
    /// Keep the `[start, end]` range, in seconds
    pub fn trim(self, start: f64, end: f64) -> BuildResult<Self> {
        self.filter("trim", FilterArgs::new().arg(start).arg(end), &[V], vec![V])
    }

    /// Rewrite presentation timestamps
    pub fn setpts(self, expr: &str) -> BuildResult<Self> {
        self.filter("setpts", FilterArgs::new().arg(expr), &[V], vec![V])
    }

    /// Restart timestamps at zero
    pub fn reset_timestamp(self) -> BuildResult<Self> {
        self.setpts("PTS-STARTPTS")
    }

    /// Scale to `width`x`height`; `extra` may override either or add options
    pub fn scale(self, width: i32, height: i32, extra: FilterArgs) -> BuildResult<Self> {
        let args = FilterArgs::new()
            .named("w", width)
            .named("h", height)
            .merge(extra);
        self.filter("scale", args, &[V], vec![V])
    }

    /// Sample aspect ratio
    pub fn setsar(self, num: i32, den: i32) -> BuildResult<Self> {
        self.filter(
            "setsar",
            FilterArgs::new().arg(format!("{}/{}", num, den)),
            &[V],
            vec![V],
        )
    }
}
