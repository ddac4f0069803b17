#![no_main]

use libfuzzer_sys::fuzz_target;
use memviz::config::RenderConfig;
use memviz::dot_output::DotOutput;
use memviz::pipeline::Pipeline;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let config = RenderConfig::default();
        let Ok(pipeline) = Pipeline::new(&config) else {
            return;
        };
        // Any transcript either renders or reports NoAddresses, never panics
        if let Ok(graph) = pipeline.render(input) {
            let _ = DotOutput::new(config.theme.palette(), config.style.clone(), config.labels)
                .render(&graph);
        }
    }
});
