use std::fmt;
use std::io;

/// Where a buffer allocation was attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocSite {
    Features,
    Labels,
    Weights,
    SwapWeights,
    ForwardCache,
    Deltas,
    Scratch,
}

impl fmt::Display for AllocSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AllocSite::Features => "example features",
            AllocSite::Labels => "example labels",
            AllocSite::Weights => "weights",
            AllocSite::SwapWeights => "swap weights",
            AllocSite::ForwardCache => "forward cache",
            AllocSite::Deltas => "layer deltas",
            AllocSite::Scratch => "prediction scratch",
        };
        f.write_str(name)
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        OutOfMemory(site: AllocSite) {
            description("not enough memory")
            display("not enough memory for {}", site)
        }
        Io(err: io::Error) {
            from()
            cause(err)
            description("io error")
            display("io error: {}", err)
        }
        Csv(err: csv::Error) {
            from()
            cause(err)
            description("csv error")
            display("csv error: {}", err)
        }
        Parse(line: usize, reason: String) {
            description("unable to parse example")
            display("line {}: {}", line, reason)
        }
        TooManyExamples(limit: usize) {
            description("too many examples")
            display("more than {} examples", limit)
        }
        Config(reason: String) {
            description("invalid configuration")
            display("invalid configuration: {}", reason)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {

    /// Process exit code, distinct per error kind and allocation site.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => -1,
            Error::Io(_) => -2,
            Error::Parse(_, _) => -3,
            Error::TooManyExamples(_) => -4,
            Error::Csv(_) => -5,
            Error::OutOfMemory(site) => match site {
                AllocSite::Features => -10,
                AllocSite::Labels => -11,
                AllocSite::Weights => -12,
                AllocSite::SwapWeights => -13,
                AllocSite::ForwardCache => -14,
                AllocSite::Deltas => -15,
                AllocSite::Scratch => -16,
            },
        }
    }

}

/// Empty vector with room for exactly `capacity` elements.
pub fn try_with_capacity<T>(capacity: usize, site: AllocSite) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(capacity).map_err(|_| Error::OutOfMemory(site))?;
    Ok(buffer)
}

/// Allocates exactly `len` elements of `value`, or fails without a partial buffer.
pub fn try_alloc(value: f64, len: usize, site: AllocSite) -> Result<Vec<f64>> {
    let mut buffer = try_with_capacity(len, site)?;
    buffer.resize(len, value);
    Ok(buffer)
}
