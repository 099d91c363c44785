mod json_word_extractor_test;
