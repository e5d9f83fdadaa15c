use super::{FilterArgs, FilterChainMut};
use crate::core::{leading_integer, Audio, ChannelLayout, MediaType};
use crate::error::{BuildError, BuildResult};

const A: MediaType = MediaType::Audio;

impl<'a> FilterChainMut<'a, Audio> {
    /// Split one stream into one output per channel of `channel_layout`
    pub fn channelsplit(self, args: FilterArgs) -> BuildResult<Self> {
        let Some(layout) = args.get("channel_layout") else {
            return Err(BuildError::MissingFilterArgument {
                filter: "channelsplit",
                argument: "channel_layout",
            });
        };

        let channels = ChannelLayout::parse(layout).count();
        self.filter("channelsplit", args, &[A], vec![A; channels])
    }

    /// Change the volume by `db` decibels
    pub fn volume(self, db: f64) -> BuildResult<Self> {
        self.filter(
            "volume",
            FilterArgs::new().arg(format!("{:.6}dB", db)),
            &[A],
            vec![A],
        )
    }

    /// Duplicate the stream `count` times (`asplit`)
    pub fn split(self, count: usize) -> BuildResult<Self> {
        self.filter("asplit", FilterArgs::new().arg(count), &[A], vec![A; count])
    }

    /// Mix every current output into one (`amix`)
    ///
    /// `inputs` defaults to the number of streams the chain produces.
    pub fn mix(self, args: FilterArgs) -> BuildResult<Self> {
        let args = if args.contains("inputs") {
            args
        } else {
            let inputs = self.signature().len();
            args.named("inputs", inputs)
        };

        let inputs = args
            .get("inputs")
            .map(leading_integer)
            .unwrap_or(0)
            .max(0) as usize;

        self.filter("amix", args, &vec![A; inputs], vec![A])
    }

    /// Keep the `[start, end]` range, in seconds (`atrim`)
    pub fn trim(self, start: f64, end: f64) -> BuildResult<Self> {
        self.filter("atrim", FilterArgs::new().arg(start).arg(end), &[A], vec![A])
    }

    /// Rewrite presentation timestamps (`asetpts`)
    pub fn setpts(self, expr: &str) -> BuildResult<Self> {
        self.filter("asetpts", FilterArgs::new().arg(expr), &[A], vec![A])
    }

    /// Restart timestamps at zero
    pub fn reset_timestamp(self) -> BuildResult<Self> {
        self.setpts("PTS-STARTPTS")
    }

    /// Fade of `fade_type` (`in`/`out`) enabled between `start` and `end` (`afade`)
    pub fn fade(self, fade_type: &str, start: f64, end: f64) -> BuildResult<Self> {
        let args = FilterArgs::new()
            .named("enable", format!("'between(t,{:.6},{:.6})'", start, end))
            .named("t", fade_type)
            .named("st", start);
        self.filter("afade", args, &[A], vec![A])
    }

    /// Dynamic audio normalizer
    pub fn dynaudnorm(self, args: FilterArgs) -> BuildResult<Self> {
        self.filter("dynaudnorm", args, &[A], vec![A])
    }
}
