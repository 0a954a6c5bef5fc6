// Tally - A sampling InfluxDB metrics client for Rust!
//
// To the extent possible under law, the author(s) have dedicated all copyright and
// related and neighboring rights to this file to the public domain worldwide.
// This software is distributed without any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication along with this
// software. If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.

use std::time::Instant;
use tally::MetricsEmitter;
use tally_macros::{tally_decr, tally_incr, tally_record, tally_timing, tally_timing_raw};

fn main() {
    let start = Instant::now();

    // Safe to call before the default is set, nothing is sent
    tally_incr!("early.counter");

    let client = MetricsEmitter::from_url("influxdb://localhost:4444/example").unwrap();
    tally_macros::set_global_default(client);

    tally_incr!("some.counter");
    tally_decr!("some.counter", 2);
    tally_timing_raw!("some.timer", 1500, 0.5);
    tally_timing!("some.timer", start);
    tally_record!("some.query", "rows" => 12i64, "load" => 0.75);
}
