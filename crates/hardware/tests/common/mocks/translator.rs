use iss_core::common::{AccessType, TranslationResult, VirtAddr};
use iss_core::core::units::mmu::Translate;
use mockall::mock;

mock! {
    pub Translator {}
    impl Translate for Translator {
        fn translate(&mut self, vaddr: VirtAddr, access: AccessType) -> TranslationResult;
    }
}
