#![no_main]

use arbitrary::Arbitrary;
use hookline_timeline::TimelineParser;
use libfuzzer_sys::fuzz_target;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// (기대 컨테이너 이름, 캡처된 출력) 쌍
    blobs: Vec<(String, String)>,
}

fuzz_target!(|input: FuzzInput| {
    let parser = TimelineParser::new().with_max_blob_bytes(64 * 1024);

    // 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    if let Ok(results) = parser.parse(input.blobs.iter().take(8).cloned()) {
        for timeline in results.timelines() {
            let events = timeline.events();
            assert!(events.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        }
    }
});
