// Report lines follow the prometheus text exposition format, histograms written as quantiles.
// [1]: https://github.com/prometheus/docs/blob/master/content/docs/instrumenting/exposition_formats.md

use hdrhistogram::Histogram;
use std::fmt;
use std::time::Duration;

use crate::error::*;

/// Per-unit statistics of a trace: how many rays each unit of work produced and how long it
/// took.
pub struct TraceStats {
    rays: Histogram<u64>,
    micros: Histogram<u64>,
    total_points: u64,
    total_rays: u64,
}

impl TraceStats {
    pub fn new() -> Result<Self> {
        Ok(TraceStats { rays: histogram()?, micros: histogram()?, total_points: 0, total_rays: 0 })
    }

    pub fn record_unit(&mut self, points: usize, rays: usize, elapsed: Duration) {
        self.rays.saturating_record(rays as u64);
        self.micros.saturating_record(elapsed.as_micros() as u64);
        self.total_points += points as u64;
        self.total_rays += rays as u64;
    }

    pub fn units(&self) -> u64 {
        self.rays.len()
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn total_rays(&self) -> u64 {
        self.total_rays
    }

    pub fn report(&self, trace_name: &str) -> String {
        let mut out = String::with_capacity(1024);
        // writing into a String cannot fail
        let _ = self.write(&mut out, trace_name);
        out
    }

    pub fn write<W: fmt::Write>(&self, out: &mut W, trace_name: &str) -> fmt::Result {
        let labels = FmtLabels { trace: trace_name, quantile: None };
        write_metric(out, &"trace_units", &labels, &self.units())?;
        write_metric(out, &"trace_points", &labels, &self.total_points)?;
        write_metric(out, &"trace_rays", &labels, &self.total_rays)?;
        if self.units() > 0 {
            write_histogram(out, &"trace_unit_rays", &labels, &self.rays)?;
            write_histogram(out, &"trace_unit_micros", &labels, &self.micros)?;
        }
        Ok(())
    }
}

fn histogram() -> Result<Histogram<u64>> {
    Histogram::new(3).map_err(|e| TraceError::Metrics { reason: format!("{:?}", e) })
}

fn write_histogram<N: fmt::Display, W: fmt::Write>(
    out: &mut W, name: &N, labels: &FmtLabels, h: &Histogram<u64>,
) -> fmt::Result {
    for quantile in [0.5, 0.9, 0.99].iter() {
        let labels = FmtLabels { quantile: Some(*quantile), ..*labels };
        write_metric(out, name, &labels, &h.value_at_quantile(*quantile))?;
    }
    write_metric(out, &format_args!("{}_min", name), labels, &h.min())?;
    write_metric(out, &format_args!("{}_max", name), labels, &h.max())
}

fn write_metric<W: fmt::Write, N: fmt::Display, V: fmt::Display>(
    out: &mut W, name: &N, labels: &FmtLabels, v: &V,
) -> fmt::Result {
    writeln!(out, "{}{} {}", name, labels, v)
}

#[derive(Copy, Clone)]
struct FmtLabels<'a> {
    trace: &'a str,
    quantile: Option<f64>,
}

impl<'a> fmt::Display for FmtLabels<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{trace=\"{}\"", self.trace)?;
        if let Some(q) = self.quantile {
            write!(f, ", quantile=\"{}\"", q)?;
        }
        write!(f, "}}")
    }
}
